//! Sync resolver: collapses changelog records and resolves current entity
//! state for incremental client sync.

use log::{debug, error};
use std::collections::HashMap;
use std::sync::Arc;

use crate::changelog::{ChangeEntity, ChangeLogRepositoryTrait, ChangeRecord};
use crate::errors::Result;
use crate::spaces::SpaceRepositoryTrait;
use crate::sync::SyncResult;
use crate::tags::TagRepositoryTrait;
use crate::tasks::TaskRepositoryTrait;
use crate::templates::RepetitiveTaskTemplateRepositoryTrait;

pub trait SyncServiceTrait: Send + Sync {
    /// Resolve everything the user needs to catch up from `last_change_id`.
    ///
    /// The result is all-or-nothing: any repository failure aborts the whole
    /// call and the client should retry with the same cursor.
    fn sync(&self, user_id: &str, last_change_id: i64) -> Result<SyncResult>;
}

/// Collapse an ascending change sequence to the latest record per entity.
///
/// Returns the surviving records and the new cursor value. The cursor starts
/// at the input value so it never regresses when the window is empty.
fn collapse_changes(records: Vec<ChangeRecord>, cursor: i64) -> (Vec<ChangeRecord>, i64) {
    let mut latest_change_id = cursor;
    let mut survivors: HashMap<(ChangeEntity, String), ChangeRecord> = HashMap::new();
    for record in records {
        latest_change_id = latest_change_id.max(record.sequence_id);
        // Ascending input order makes plain overwrite last-write-wins.
        survivors.insert((record.entity, record.entity_id.clone()), record);
    }
    (survivors.into_values().collect(), latest_change_id)
}

/// Drop any fetched row whose owner is not the requesting user.
///
/// Repositories scope their queries, so a hit here is a bug upstream; the
/// row is excluded rather than leaked.
fn retain_owned<T>(rows: Vec<T>, user_id: &str, owner_of: fn(&T) -> &str, kind: &str) -> Vec<T> {
    rows.into_iter()
        .filter(|row| {
            let owned = owner_of(row) == user_id;
            if !owned {
                error!("Sync fetched a foreign {kind} row for user {user_id}; excluding it");
            }
            owned
        })
        .collect()
}

fn non_empty<T>(rows: Vec<T>) -> Option<Vec<T>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

/// Resolver over the changelog and the per-entity repositories.
pub struct SyncService {
    changelog_repository: Arc<dyn ChangeLogRepositoryTrait>,
    task_repository: Arc<dyn TaskRepositoryTrait>,
    tag_repository: Arc<dyn TagRepositoryTrait>,
    space_repository: Arc<dyn SpaceRepositoryTrait>,
    template_repository: Arc<dyn RepetitiveTaskTemplateRepositoryTrait>,
}

impl SyncService {
    pub fn new(
        changelog_repository: Arc<dyn ChangeLogRepositoryTrait>,
        task_repository: Arc<dyn TaskRepositoryTrait>,
        tag_repository: Arc<dyn TagRepositoryTrait>,
        space_repository: Arc<dyn SpaceRepositoryTrait>,
        template_repository: Arc<dyn RepetitiveTaskTemplateRepositoryTrait>,
    ) -> Self {
        Self {
            changelog_repository,
            task_repository,
            tag_repository,
            space_repository,
            template_repository,
        }
    }
}

impl SyncServiceTrait for SyncService {
    fn sync(&self, user_id: &str, last_change_id: i64) -> Result<SyncResult> {
        let records = self
            .changelog_repository
            .get_changes_since(user_id, last_change_id)?;
        if records.is_empty() {
            return Ok(SyncResult::up_to_date(last_change_id));
        }

        let record_count = records.len();
        let (survivors, latest_change_id) = collapse_changes(records, last_change_id);

        // Partition surviving entity ids by kind. Deleted ids stay in the
        // lists; their fetch simply finds no row and they are omitted from
        // the response (clients catching up past a delete see no entity).
        let mut task_ids: Vec<String> = Vec::new();
        let mut tag_ids: Vec<String> = Vec::new();
        let mut space_ids: Vec<String> = Vec::new();
        let mut template_ids: Vec<String> = Vec::new();
        for record in &survivors {
            match record.entity {
                ChangeEntity::Task => task_ids.push(record.entity_id.clone()),
                ChangeEntity::Tag => tag_ids.push(record.entity_id.clone()),
                ChangeEntity::Space => space_ids.push(record.entity_id.clone()),
                ChangeEntity::RepetitiveTaskTemplate => {
                    template_ids.push(record.entity_id.clone())
                }
            }
        }

        let tasks = if task_ids.is_empty() {
            Vec::new()
        } else {
            let rows = self.task_repository.fetch_by_ids(user_id, &task_ids)?;
            retain_owned(rows, user_id, |t| &t.user_id, "task")
        };
        let tags = if tag_ids.is_empty() {
            Vec::new()
        } else {
            let rows = self.tag_repository.fetch_by_ids(user_id, &tag_ids)?;
            retain_owned(rows, user_id, |t| &t.user_id, "tag")
        };
        let spaces = if space_ids.is_empty() {
            Vec::new()
        } else {
            let rows = self.space_repository.fetch_by_ids(user_id, &space_ids)?;
            retain_owned(rows, user_id, |s| &s.user_id, "space")
        };
        let templates = if template_ids.is_empty() {
            Vec::new()
        } else {
            let rows = self
                .template_repository
                .fetch_by_ids(user_id, &template_ids)?;
            retain_owned(rows, user_id, |t| &t.user_id, "repetitive task template")
        };

        debug!(
            "Sync for user {user_id}: {record_count} records collapsed to {} entities, cursor {last_change_id} -> {latest_change_id}",
            survivors.len()
        );

        Ok(SyncResult {
            latest_change_id,
            tasks: non_empty(tasks),
            tags: non_empty(tags),
            spaces: non_empty(spaces),
            repetitive_task_templates: non_empty(templates),
        })
    }
}
