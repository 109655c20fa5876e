use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use taskdeck_core::spaces::Space;

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
#[diesel(table_name = crate::schema::spaces)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SpaceDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SpaceDB> for Space {
    fn from(db: SpaceDB) -> Self {
        Space {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::spaces)]
pub struct SpaceChangesDB {
    pub name: String,
    pub updated_at: String,
}
