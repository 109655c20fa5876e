use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use taskdeck_core::tags::Tag;

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TagDB> for Tag {
    fn from(db: TagDB) -> Self {
        Tag {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            color: db.color,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(treat_none_as_null = true)]
pub struct TagChangesDB {
    pub name: String,
    pub color: Option<String>,
    pub updated_at: String,
}
