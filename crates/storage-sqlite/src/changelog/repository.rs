//! Changelog append and read operations.

use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use taskdeck_core::changelog::{
    ChangeEntity, ChangeLogRepositoryTrait, ChangeOperation, ChangeRecord,
};
use taskdeck_core::errors::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::changelog;

use super::model::ChangeRecordDB;

fn enum_to_db<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

/// What a mutation handler wants recorded about its write.
#[derive(Debug, Clone)]
pub struct ChangeWriteRequest {
    pub user_id: String,
    pub entity: ChangeEntity,
    pub entity_id: String,
    pub operation: ChangeOperation,
}

impl ChangeWriteRequest {
    pub fn new(
        user_id: impl Into<String>,
        entity: ChangeEntity,
        entity_id: impl Into<String>,
        operation: ChangeOperation,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            entity,
            entity_id: entity_id.into(),
            operation,
        }
    }
}

/// Append one change record inside the caller's open transaction.
///
/// Must run in the same transaction as the entity mutation it describes;
/// the assigned sequence id is `max(sequence_id) + 1` within the user's
/// scope. All writes are serialized by the writer actor, so the max query
/// cannot race a concurrent append for the same user.
pub fn append_change(conn: &mut SqliteConnection, request: ChangeWriteRequest) -> Result<i64> {
    let current_max = changelog::table
        .filter(changelog::user_id.eq(&request.user_id))
        .select(max(changelog::sequence_id))
        .first::<Option<i64>>(conn)
        .map_err(StorageError::from)?;
    let sequence_id = current_max.unwrap_or(0) + 1;

    let row = ChangeRecordDB {
        user_id: request.user_id,
        sequence_id,
        entity: enum_to_db(&request.entity)?,
        entity_id: request.entity_id,
        operation: enum_to_db(&request.operation)?,
        occurred_at: Utc::now().to_rfc3339(),
    };

    diesel::insert_into(changelog::table)
        .values(&row)
        .execute(conn)
        .map_err(StorageError::from)?;

    Ok(sequence_id)
}

fn to_change_record(row: ChangeRecordDB) -> Result<ChangeRecord> {
    Ok(ChangeRecord {
        user_id: row.user_id,
        sequence_id: row.sequence_id,
        entity: enum_from_db(&row.entity)?,
        entity_id: row.entity_id,
        operation: enum_from_db(&row.operation)?,
        occurred_at: row.occurred_at,
    })
}

/// Read side of the changelog.
pub struct ChangeLogRepository {
    pool: Arc<DbPool>,
}

impl ChangeLogRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl ChangeLogRepositoryTrait for ChangeLogRepository {
    fn get_changes_since(&self, user_id: &str, last_change_id: i64) -> Result<Vec<ChangeRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = changelog::table
            .filter(changelog::user_id.eq(user_id))
            .filter(changelog::sequence_id.gt(last_change_id))
            .order(changelog::sequence_id.asc())
            .load::<ChangeRecordDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_change_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::dsl::count_star;

    use crate::schema::tasks;
    use crate::tasks::TaskDB;
    use crate::test_support::setup_db;
    use taskdeck_core::errors::{DatabaseError, Error};

    fn append_for(
        conn: &mut SqliteConnection,
        user_id: &str,
        entity_id: &str,
        operation: ChangeOperation,
    ) -> Result<i64> {
        append_change(
            conn,
            ChangeWriteRequest::new(user_id, ChangeEntity::Task, entity_id, operation),
        )
    }

    fn task_row(user_id: &str, task_id: &str) -> TaskDB {
        TaskDB {
            id: task_id.to_string(),
            user_id: user_id.to_string(),
            space_id: None,
            title: "ledger test".to_string(),
            description: None,
            due_at: None,
            is_done: false,
            created_at: "2026-04-12T00:00:00Z".to_string(),
            updated_at: "2026-04-12T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn appends_assign_strictly_increasing_sequence_ids() {
        let (_pool, writer) = setup_db();

        for expected in 1..=3i64 {
            let assigned = writer
                .exec(move |conn| append_for(conn, "u1", "t1", ChangeOperation::Update))
                .await
                .expect("append");
            assert_eq!(assigned, expected);
        }
    }

    #[tokio::test]
    async fn concurrent_appends_for_one_user_yield_distinct_sequential_ids() {
        let (_pool, writer) = setup_db();
        const APPENDS: i64 = 16;

        let mut handles = Vec::new();
        for n in 0..APPENDS {
            let writer = writer.clone();
            handles.push(tokio::spawn(async move {
                writer
                    .exec(move |conn| {
                        append_for(conn, "u1", &format!("t{n}"), ChangeOperation::Create)
                    })
                    .await
                    .expect("append")
            }));
        }

        let mut assigned = Vec::new();
        for handle in handles {
            assigned.push(handle.await.expect("join"));
        }
        assigned.sort_unstable();

        assert_eq!(assigned, (1..=APPENDS).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn sequence_spaces_are_independent_per_user() {
        let (_pool, writer) = setup_db();

        let first = writer
            .exec(|conn| {
                append_for(conn, "u1", "t1", ChangeOperation::Create)?;
                append_for(conn, "u1", "t2", ChangeOperation::Create)
            })
            .await
            .expect("appends for u1");
        assert_eq!(first, 2);

        let other = writer
            .exec(|conn| append_for(conn, "u2", "t9", ChangeOperation::Create))
            .await
            .expect("append for u2");
        assert_eq!(other, 1, "second user starts their own sequence");
    }

    #[tokio::test]
    async fn failed_job_rolls_back_entity_and_change_record_together() {
        let (pool, writer) = setup_db();

        let result = writer
            .exec(|conn| {
                diesel::insert_into(tasks::table)
                    .values(task_row("u1", "t-rollback"))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                append_for(conn, "u1", "t-rollback", ChangeOperation::Create)?;
                Err::<(), _>(Error::Database(DatabaseError::Internal(
                    "simulated failure after append".to_string(),
                )))
            })
            .await;
        assert!(result.is_err());

        let mut conn = get_connection(&pool).expect("conn");
        let task_count: i64 = tasks::table
            .select(count_star())
            .first(&mut conn)
            .expect("count tasks");
        let change_count: i64 = changelog::table
            .select(count_star())
            .first(&mut conn)
            .expect("count changes");
        assert_eq!(task_count, 0, "entity insert must be rolled back");
        assert_eq!(change_count, 0, "change append must be rolled back");
    }

    #[tokio::test]
    async fn reads_are_ascending_and_respect_the_cursor() {
        let (pool, writer) = setup_db();
        let repo = ChangeLogRepository::new(pool);

        writer
            .exec(|conn| {
                append_for(conn, "u1", "t1", ChangeOperation::Create)?;
                append_for(conn, "u1", "t2", ChangeOperation::Create)?;
                append_for(conn, "u1", "t1", ChangeOperation::Delete)
            })
            .await
            .expect("appends");

        let all = repo.get_changes_since("u1", 0).expect("read all");
        assert_eq!(
            all.iter().map(|r| r.sequence_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(all[2].operation, ChangeOperation::Delete);

        let tail = repo.get_changes_since("u1", 2).expect("read tail");
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].sequence_id, 3);

        assert!(repo.get_changes_since("u1", 3).expect("caught up").is_empty());
        assert!(repo.get_changes_since("u2", 0).expect("other user").is_empty());
    }
}
