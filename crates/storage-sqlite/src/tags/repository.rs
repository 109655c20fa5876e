use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use taskdeck_core::changelog::{ChangeEntity, ChangeOperation};
use taskdeck_core::errors::{Error, Result};
use taskdeck_core::tags::{NewTag, Tag, TagRepositoryTrait, TagUpdate};

use crate::changelog::{append_change, ChangeWriteRequest};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::tags;

use super::model::{TagChangesDB, TagDB};

pub struct TagRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TagRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TagRepository { pool, writer }
    }
}

#[async_trait]
impl TagRepositoryTrait for TagRepository {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tags::table
            .filter(tags::user_id.eq(user_id))
            .order(tags::name.asc())
            .load::<TagDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    fn get_tag(&self, user_id: &str, tag_id: &str) -> Result<Tag> {
        let mut conn = get_connection(&self.pool)?;
        let row = tags::table
            .filter(tags::id.eq(tag_id))
            .filter(tags::user_id.eq(user_id))
            .first::<TagDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Tag::from(row))
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = tags::table
            .filter(tags::user_id.eq(user_id))
            .filter(tags::id.eq_any(ids))
            .load::<TagDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Tag> {
                let now = Utc::now().to_rfc3339();
                let row = TagDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: new_tag.user_id,
                    name: new_tag.name,
                    color: new_tag.color,
                    created_at: now.clone(),
                    updated_at: now,
                };
                let inserted = diesel::insert_into(tags::table)
                    .values(&row)
                    .returning(TagDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        inserted.user_id.as_str(),
                        ChangeEntity::Tag,
                        inserted.id.as_str(),
                        ChangeOperation::Create,
                    ),
                )?;
                Ok(Tag::from(inserted))
            })
            .await
    }

    async fn update_tag(&self, update: TagUpdate) -> Result<Tag> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Tag> {
                let changes = TagChangesDB {
                    name: update.name,
                    color: update.color,
                    updated_at: Utc::now().to_rfc3339(),
                };
                let affected = diesel::update(
                    tags::table
                        .filter(tags::id.eq(&update.id))
                        .filter(tags::user_id.eq(&update.user_id)),
                )
                .set(&changes)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Tag {} not found", update.id)));
                }

                let row = tags::table
                    .filter(tags::id.eq(&update.id))
                    .first::<TagDB>(conn)
                    .map_err(StorageError::from)?;
                append_change(
                    conn,
                    ChangeWriteRequest::new(
                        update.user_id.as_str(),
                        ChangeEntity::Tag,
                        update.id.as_str(),
                        ChangeOperation::Update,
                    ),
                )?;
                Ok(Tag::from(row))
            })
            .await
    }

    async fn delete_tag(&self, user_id: String, tag_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(
                    tags::table
                        .filter(tags::id.eq(&tag_id))
                        .filter(tags::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected > 0 {
                    append_change(
                        conn,
                        ChangeWriteRequest::new(
                            user_id.as_str(),
                            ChangeEntity::Tag,
                            tag_id.as_str(),
                            ChangeOperation::Delete,
                        ),
                    )?;
                }

                Ok(affected)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::ChangeLogRepository;
    use crate::test_support::setup_db;
    use taskdeck_core::changelog::ChangeLogRepositoryTrait;

    #[tokio::test]
    async fn tag_mutations_share_the_owners_sequence_space() {
        let (pool, writer) = setup_db();
        let repo = TagRepository::new(pool.clone(), writer);
        let changes = ChangeLogRepository::new(pool);

        let tag = repo
            .create_tag(NewTag {
                user_id: "u1".to_string(),
                name: "errands".to_string(),
                color: Some("#00aa55".to_string()),
            })
            .await
            .expect("create");
        repo.delete_tag("u1".to_string(), tag.id.clone())
            .await
            .expect("delete");

        let records = changes.get_changes_since("u1", 0).expect("changes");
        assert_eq!(
            records
                .iter()
                .map(|r| (r.sequence_id, r.operation))
                .collect::<Vec<_>>(),
            vec![(1, ChangeOperation::Create), (2, ChangeOperation::Delete)]
        );
        assert!(records.iter().all(|r| r.entity == ChangeEntity::Tag));
    }
}
