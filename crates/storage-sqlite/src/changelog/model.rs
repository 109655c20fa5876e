//! Database model for changelog rows.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One appended change row. Append-only: no `AsChangeset`, the application
/// never updates or deletes changelog rows.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, Serialize, Deserialize)]
#[diesel(primary_key(user_id, sequence_id))]
#[diesel(table_name = crate::schema::changelog)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChangeRecordDB {
    pub user_id: String,
    pub sequence_id: i64,
    pub entity: String,
    pub entity_id: String,
    pub operation: String,
    pub occurred_at: String,
}
