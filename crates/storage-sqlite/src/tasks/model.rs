//! Database models for tasks.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use taskdeck_core::tasks::Task;

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
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskDB {
    pub id: String,
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub is_done: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TaskDB> for Task {
    fn from(db: TaskDB) -> Self {
        Task {
            id: db.id,
            user_id: db.user_id,
            space_id: db.space_id,
            title: db.title,
            description: db.description,
            due_at: db.due_at,
            is_done: db.is_done,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Columns written on update. `treat_none_as_null` gives full-row PUT
/// semantics: an omitted optional field clears the column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangesDB {
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub is_done: bool,
    pub updated_at: String,
}
