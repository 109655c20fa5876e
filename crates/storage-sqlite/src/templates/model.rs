use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use taskdeck_core::templates::RepetitiveTaskTemplate;

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
#[diesel(table_name = crate::schema::repetitive_task_templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RepetitiveTaskTemplateDB {
    pub id: String,
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub is_paused: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RepetitiveTaskTemplateDB> for RepetitiveTaskTemplate {
    fn from(db: RepetitiveTaskTemplateDB) -> Self {
        RepetitiveTaskTemplate {
            id: db.id,
            user_id: db.user_id,
            space_id: db.space_id,
            title: db.title,
            description: db.description,
            recurrence_rule: db.recurrence_rule,
            next_due_at: db.next_due_at,
            is_paused: db.is_paused,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::repetitive_task_templates)]
#[diesel(treat_none_as_null = true)]
pub struct RepetitiveTaskTemplateChangesDB {
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub is_paused: bool,
    pub updated_at: String,
}
