//! Changelog domain model: the per-user ledger of entity mutations.
//!
//! Every create/update/delete of a synced entity appends one immutable
//! [`ChangeRecord`] inside the same transaction as the entity mutation.
//! Records are ordered per user by `sequence_id` and are never updated or
//! deleted by the application.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Entity kinds tracked by the changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEntity {
    Task,
    Tag,
    Space,
    RepetitiveTaskTemplate,
}

/// Operations recorded by the changelog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    Create,
    Update,
    Delete,
}

/// One immutable changelog fact: entity `entity_id` of kind `entity` owned by
/// `user_id` underwent `operation` at per-user sequence `sequence_id`.
///
/// `occurred_at` is informational wall-clock time; ordering is always by
/// `sequence_id`, which reflects commit order and can diverge from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub user_id: String,
    pub sequence_id: i64,
    pub entity: ChangeEntity,
    pub entity_id: String,
    pub operation: ChangeOperation,
    pub occurred_at: String,
}

/// Read side of the changelog, implemented by the storage crate.
///
/// The write side (`append_change`) lives with the storage transaction
/// machinery because it must run inside the mutation's own transaction.
pub trait ChangeLogRepositoryTrait: Send + Sync {
    /// All records for `user_id` with `sequence_id > last_change_id`,
    /// ascending by `sequence_id`. An empty result means the client already
    /// has the latest state.
    fn get_changes_since(&self, user_id: &str, last_change_id: i64) -> Result<Vec<ChangeRecord>>;
}
