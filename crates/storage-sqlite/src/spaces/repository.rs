use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use taskdeck_core::changelog::{ChangeEntity, ChangeOperation};
use taskdeck_core::errors::{Error, Result};
use taskdeck_core::spaces::{NewSpace, Space, SpaceRepositoryTrait, SpaceUpdate};

use crate::changelog::{append_change, ChangeWriteRequest};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::spaces;

use super::model::{SpaceChangesDB, SpaceDB};

pub struct SpaceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SpaceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SpaceRepository { pool, writer }
    }
}

#[async_trait]
impl SpaceRepositoryTrait for SpaceRepository {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = spaces::table
            .filter(spaces::user_id.eq(user_id))
            .order(spaces::name.asc())
            .load::<SpaceDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Space::from).collect())
    }

    fn get_space(&self, user_id: &str, space_id: &str) -> Result<Space> {
        let mut conn = get_connection(&self.pool)?;
        let row = spaces::table
            .filter(spaces::id.eq(space_id))
            .filter(spaces::user_id.eq(user_id))
            .first::<SpaceDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Space::from(row))
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Space>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = spaces::table
            .filter(spaces::user_id.eq(user_id))
            .filter(spaces::id.eq_any(ids))
            .load::<SpaceDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Space::from).collect())
    }

    async fn create_space(&self, new_space: NewSpace) -> Result<Space> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Space> {
                let now = Utc::now().to_rfc3339();
                let row = SpaceDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: new_space.user_id,
                    name: new_space.name,
                    created_at: now.clone(),
                    updated_at: now,
                };
                let inserted = diesel::insert_into(spaces::table)
                    .values(&row)
                    .returning(SpaceDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        inserted.user_id.as_str(),
                        ChangeEntity::Space,
                        inserted.id.as_str(),
                        ChangeOperation::Create,
                    ),
                )?;
                Ok(Space::from(inserted))
            })
            .await
    }

    async fn update_space(&self, update: SpaceUpdate) -> Result<Space> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Space> {
                let changes = SpaceChangesDB {
                    name: update.name,
                    updated_at: Utc::now().to_rfc3339(),
                };
                let affected = diesel::update(
                    spaces::table
                        .filter(spaces::id.eq(&update.id))
                        .filter(spaces::user_id.eq(&update.user_id)),
                )
                .set(&changes)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Space {} not found", update.id)));
                }

                let row = spaces::table
                    .filter(spaces::id.eq(&update.id))
                    .first::<SpaceDB>(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        update.user_id.as_str(),
                        ChangeEntity::Space,
                        update.id.as_str(),
                        ChangeOperation::Update,
                    ),
                )?;
                Ok(Space::from(row))
            })
            .await
    }

    async fn delete_space(&self, user_id: String, space_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    spaces::table
                        .filter(spaces::id.eq(&space_id))
                        .filter(spaces::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected > 0 {
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            user_id.as_str(),
                            ChangeEntity::Space,
                            space_id.as_str(),
                            ChangeOperation::Delete,
                        ),
                    )?;
                }

                Ok(affected)
            })
            .await
    }
}
