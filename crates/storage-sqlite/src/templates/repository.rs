use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use taskdeck_core::changelog::{ChangeEntity, ChangeOperation};
use taskdeck_core::errors::{Error, Result};
use taskdeck_core::templates::{
    NewRepetitiveTaskTemplate, RepetitiveTaskTemplate, RepetitiveTaskTemplateRepositoryTrait,
    RepetitiveTaskTemplateUpdate,
};

use crate::changelog::{append_change, ChangeWriteRequest};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::repetitive_task_templates;

use super::model::{RepetitiveTaskTemplateChangesDB, RepetitiveTaskTemplateDB};

pub struct RepetitiveTaskTemplateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RepetitiveTaskTemplateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RepetitiveTaskTemplateRepository { pool, writer }
    }
}

#[async_trait]
impl RepetitiveTaskTemplateRepositoryTrait for RepetitiveTaskTemplateRepository {
    fn list_templates(&self, user_id: &str) -> Result<Vec<RepetitiveTaskTemplate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = repetitive_task_templates::table
            .filter(repetitive_task_templates::user_id.eq(user_id))
            .order(repetitive_task_templates::created_at.asc())
            .load::<RepetitiveTaskTemplateDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(RepetitiveTaskTemplate::from).collect())
    }

    fn get_template(&self, user_id: &str, template_id: &str) -> Result<RepetitiveTaskTemplate> {
        let mut conn = get_connection(&self.pool)?;
        let row = repetitive_task_templates::table
            .filter(repetitive_task_templates::id.eq(template_id))
            .filter(repetitive_task_templates::user_id.eq(user_id))
            .first::<RepetitiveTaskTemplateDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(RepetitiveTaskTemplate::from(row))
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<RepetitiveTaskTemplate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = repetitive_task_templates::table
            .filter(repetitive_task_templates::user_id.eq(user_id))
            .filter(repetitive_task_templates::id.eq_any(ids))
            .load::<RepetitiveTaskTemplateDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(RepetitiveTaskTemplate::from).collect())
    }

    async fn create_template(
        &self,
        new_template: NewRepetitiveTaskTemplate,
    ) -> Result<RepetitiveTaskTemplate> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<RepetitiveTaskTemplate> {
                    let now = Utc::now().to_rfc3339();
                    let row = RepetitiveTaskTemplateDB {
                        id: Uuid::new_v4().to_string(),
                        user_id: new_template.user_id,
                        space_id: new_template.space_id,
                        title: new_template.title,
                        description: new_template.description,
                        recurrence_rule: new_template.recurrence_rule,
                        next_due_at: new_template.next_due_at,
                        is_paused: false,
                        created_at: now.clone(),
                        updated_at: now,
                    };
                    let inserted = diesel::insert_into(repetitive_task_templates::table)
                        .values(&row)
                        .returning(RepetitiveTaskTemplateDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            inserted.user_id.as_str(),
                            ChangeEntity::RepetitiveTaskTemplate,
                            inserted.id.as_str(),
                            ChangeOperation::Create,
                        ),
                    )?;
                    Ok(RepetitiveTaskTemplate::from(inserted))
                },
            )
            .await
    }

    async fn update_template(
        &self,
        update: RepetitiveTaskTemplateUpdate,
    ) -> Result<RepetitiveTaskTemplate> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<RepetitiveTaskTemplate> {
                    let changes = RepetitiveTaskTemplateChangesDB {
                        space_id: update.space_id,
                        title: update.title,
                        description: update.description,
                        recurrence_rule: update.recurrence_rule,
                        next_due_at: update.next_due_at,
                        is_paused: update.is_paused,
                        updated_at: Utc::now().to_rfc3339(),
                    };
                    let affected = diesel::update(
                        repetitive_task_templates::table
                            .filter(repetitive_task_templates::id.eq(&update.id))
                            .filter(repetitive_task_templates::user_id.eq(&update.user_id)),
                    )
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                    if affected == 0 {
                        return Err(Error::not_found(format!(
                            "Repetitive task template {} not found",
                            update.id
                        )));
                    }

                    let row = repetitive_task_templates::table
                        .filter(repetitive_task_templates::id.eq(&update.id))
                        .first::<RepetitiveTaskTemplateDB>(conn)
                        .map_err(StorageError::from)?;
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            update.user_id.as_str(),
                            ChangeEntity::RepetitiveTaskTemplate,
                            update.id.as_str(),
                            ChangeOperation::Update,
                        ),
                    )?;
                    Ok(RepetitiveTaskTemplate::from(row))
                },
            )
            .await
    }

    async fn delete_template(&self, user_id: String, template_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    repetitive_task_templates::table
                        .filter(repetitive_task_templates::id.eq(&template_id))
                        .filter(repetitive_task_templates::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected > 0 {
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            user_id.as_str(),
                            ChangeEntity::RepetitiveTaskTemplate,
                            template_id.as_str(),
                            ChangeOperation::Delete,
                        ),
                    )?;
                }

                Ok(affected)
            })
            .await
    }
}
