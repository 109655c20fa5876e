use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use taskdeck_core::changelog::{ChangeEntity, ChangeOperation};
use taskdeck_core::errors::{Error, Result};
use taskdeck_core::tasks::{NewTask, Task, TaskRepositoryTrait, TaskUpdate};

use crate::changelog::{append_change, ChangeWriteRequest};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::tasks;

use super::model::{TaskChangesDB, TaskDB};

pub struct TaskRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TaskRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TaskRepository { pool, writer }
    }
}

#[async_trait]
impl TaskRepositoryTrait for TaskRepository {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tasks::table
            .filter(tasks::user_id.eq(user_id))
            .order(tasks::created_at.asc())
            .load::<TaskDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Task> {
        let mut conn = get_connection(&self.pool)?;
        let row = tasks::table
            .filter(tasks::id.eq(task_id))
            .filter(tasks::user_id.eq(user_id))
            .first::<TaskDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Task::from(row))
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Task>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = tasks::table
            .filter(tasks::user_id.eq(user_id))
            .filter(tasks::id.eq_any(ids))
            .load::<TaskDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Task> {
                let now = Utc::now().to_rfc3339();
                let row = TaskDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: new_task.user_id,
                    space_id: new_task.space_id,
                    title: new_task.title,
                    description: new_task.description,
                    due_at: new_task.due_at,
                    is_done: false,
                    created_at: now.clone(),
                    updated_at: now,
                };
                let inserted = diesel::insert_into(tasks::table)
                    .values(&row)
                    .returning(TaskDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        inserted.user_id.as_str(),
                        ChangeEntity::Task,
                        inserted.id.as_str(),
                        ChangeOperation::Create,
                    ),
                )?;
                Ok(Task::from(inserted))
            })
            .await
    }

    async fn update_task(&self, update: TaskUpdate) -> Result<Task> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Task> {
                let changes = TaskChangesDB {
                    space_id: update.space_id,
                    title: update.title,
                    description: update.description,
                    due_at: update.due_at,
                    is_done: update.is_done,
                    updated_at: Utc::now().to_rfc3339(),
                };
                let affected = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(&update.id))
                        .filter(tasks::user_id.eq(&update.user_id)),
                )
                .set(&changes)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Task {} not found", update.id)));
                }

                let row = tasks::table
                    .filter(tasks::id.eq(&update.id))
                    .first::<TaskDB>(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        update.user_id.as_str(),
                        ChangeEntity::Task,
                        update.id.as_str(),
                        ChangeOperation::Update,
                    ),
                )?;
                Ok(Task::from(row))
            })
            .await
    }

    async fn delete_task(&self, user_id: String, task_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    tasks::table
                        .filter(tasks::id.eq(&task_id))
                        .filter(tasks::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected > 0 {
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            user_id.as_str(),
                            ChangeEntity::Task,
                            task_id.as_str(),
                            ChangeOperation::Delete,
                        ),
                    )?;
                }

                Ok(affected)
            })
            .await
    }
}
