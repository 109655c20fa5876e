use async_trait::async_trait;
use std::sync::Arc;

use crate::changelog::{ChangeEntity, ChangeLogRepositoryTrait, ChangeOperation, ChangeRecord};
use crate::errors::Result;
use crate::spaces::{NewSpace, Space, SpaceRepositoryTrait, SpaceUpdate};
use crate::sync::{parse_cursor, SyncResult, SyncService, SyncServiceTrait};
use crate::tags::{NewTag, Tag, TagRepositoryTrait, TagUpdate};
use crate::tasks::{NewTask, Task, TaskRepositoryTrait, TaskUpdate};
use crate::templates::{
    NewRepetitiveTaskTemplate, RepetitiveTaskTemplate, RepetitiveTaskTemplateRepositoryTrait,
    RepetitiveTaskTemplateUpdate,
};

const NOW: &str = "2026-03-01T09:00:00Z";

fn record(
    user_id: &str,
    sequence_id: i64,
    entity: ChangeEntity,
    entity_id: &str,
    operation: ChangeOperation,
) -> ChangeRecord {
    ChangeRecord {
        user_id: user_id.to_string(),
        sequence_id,
        entity,
        entity_id: entity_id.to_string(),
        operation,
        occurred_at: NOW.to_string(),
    }
}

fn task(user_id: &str, id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        user_id: user_id.to_string(),
        space_id: None,
        title: title.to_string(),
        description: None,
        due_at: None,
        is_done: false,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
    }
}

fn tag(user_id: &str, id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        color: None,
        created_at: NOW.to_string(),
        updated_at: NOW.to_string(),
    }
}

#[derive(Default)]
struct FakeChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLogRepositoryTrait for FakeChangeLog {
    fn get_changes_since(&self, user_id: &str, last_change_id: i64) -> Result<Vec<ChangeRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user_id == user_id && r.sequence_id > last_change_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeTaskRepository {
    rows: Vec<Task>,
    // When set, fetch_by_ids ignores user scoping, simulating a broken
    // repository for the defensive ownership check.
    leak_foreign_rows: bool,
}

#[async_trait]
impl TaskRepositoryTrait for FakeTaskRepository {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_task(&self, _user_id: &str, _task_id: &str) -> Result<Task> {
        unreachable!("resolver tests never call get_task")
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Task>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| ids.contains(&t.id) && (self.leak_foreign_rows || t.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn create_task(&self, _new_task: NewTask) -> Result<Task> {
        unreachable!("resolver tests never write")
    }

    async fn update_task(&self, _update: TaskUpdate) -> Result<Task> {
        unreachable!("resolver tests never write")
    }

    async fn delete_task(&self, _user_id: String, _task_id: String) -> Result<usize> {
        unreachable!("resolver tests never write")
    }
}

#[derive(Default)]
struct FakeTagRepository {
    rows: Vec<Tag>,
}

#[async_trait]
impl TagRepositoryTrait for FakeTagRepository {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_tag(&self, _user_id: &str, _tag_id: &str) -> Result<Tag> {
        unreachable!("resolver tests never call get_tag")
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Tag>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id && ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn create_tag(&self, _new_tag: NewTag) -> Result<Tag> {
        unreachable!("resolver tests never write")
    }

    async fn update_tag(&self, _update: TagUpdate) -> Result<Tag> {
        unreachable!("resolver tests never write")
    }

    async fn delete_tag(&self, _user_id: String, _tag_id: String) -> Result<usize> {
        unreachable!("resolver tests never write")
    }
}

#[derive(Default)]
struct FakeSpaceRepository {
    rows: Vec<Space>,
}

#[async_trait]
impl SpaceRepositoryTrait for FakeSpaceRepository {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>> {
        Ok(self
            .rows
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_space(&self, _user_id: &str, _space_id: &str) -> Result<Space> {
        unreachable!("resolver tests never call get_space")
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Space>> {
        Ok(self
            .rows
            .iter()
            .filter(|s| s.user_id == user_id && ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn create_space(&self, _new_space: NewSpace) -> Result<Space> {
        unreachable!("resolver tests never write")
    }

    async fn update_space(&self, _update: SpaceUpdate) -> Result<Space> {
        unreachable!("resolver tests never write")
    }

    async fn delete_space(&self, _user_id: String, _space_id: String) -> Result<usize> {
        unreachable!("resolver tests never write")
    }
}

#[derive(Default)]
struct FakeTemplateRepository {
    rows: Vec<RepetitiveTaskTemplate>,
}

#[async_trait]
impl RepetitiveTaskTemplateRepositoryTrait for FakeTemplateRepository {
    fn list_templates(&self, user_id: &str) -> Result<Vec<RepetitiveTaskTemplate>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_template(
        &self,
        _user_id: &str,
        _template_id: &str,
    ) -> Result<RepetitiveTaskTemplate> {
        unreachable!("resolver tests never call get_template")
    }

    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<RepetitiveTaskTemplate>> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id && ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn create_template(
        &self,
        _new_template: NewRepetitiveTaskTemplate,
    ) -> Result<RepetitiveTaskTemplate> {
        unreachable!("resolver tests never write")
    }

    async fn update_template(
        &self,
        _update: RepetitiveTaskTemplateUpdate,
    ) -> Result<RepetitiveTaskTemplate> {
        unreachable!("resolver tests never write")
    }

    async fn delete_template(&self, _user_id: String, _template_id: String) -> Result<usize> {
        unreachable!("resolver tests never write")
    }
}

fn build_service(
    changelog: FakeChangeLog,
    tasks: FakeTaskRepository,
    tags: FakeTagRepository,
) -> SyncService {
    SyncService::new(
        Arc::new(changelog),
        Arc::new(tasks),
        Arc::new(tags),
        Arc::new(FakeSpaceRepository::default()),
        Arc::new(FakeTemplateRepository::default()),
    )
}

#[test]
fn collapse_exposes_only_latest_record_per_entity() {
    let changelog = FakeChangeLog {
        records: vec![
            record("u1", 1, ChangeEntity::Task, "t1", ChangeOperation::Create),
            record("u1", 2, ChangeEntity::Task, "t1", ChangeOperation::Update),
            record("u1", 3, ChangeEntity::Task, "t1", ChangeOperation::Update),
        ],
    };
    let tasks = FakeTaskRepository {
        rows: vec![task("u1", "t1", "write summary")],
        ..Default::default()
    };
    let service = build_service(changelog, tasks, FakeTagRepository::default());

    let result = service.sync("u1", 0).expect("sync");

    assert_eq!(result.latest_change_id, 3);
    let returned = result.tasks.expect("tasks group present");
    assert_eq!(returned.len(), 1, "intermediate records must collapse away");
    assert_eq!(returned[0].id, "t1");
    assert!(result.tags.is_none());
    assert!(result.spaces.is_none());
    assert!(result.repetitive_task_templates.is_none());
}

#[test]
fn empty_window_keeps_cursor_unchanged() {
    let changelog = FakeChangeLog {
        records: vec![record(
            "u1",
            7,
            ChangeEntity::Task,
            "t1",
            ChangeOperation::Update,
        )],
    };
    let service = build_service(
        changelog,
        FakeTaskRepository::default(),
        FakeTagRepository::default(),
    );

    let result = service.sync("u1", 7).expect("sync");

    assert_eq!(result, SyncResult::up_to_date(7));
}

#[test]
fn partitions_changes_by_entity_kind() {
    let changelog = FakeChangeLog {
        records: vec![
            record("u1", 1, ChangeEntity::Task, "t1", ChangeOperation::Create),
            record("u1", 2, ChangeEntity::Tag, "g1", ChangeOperation::Create),
        ],
    };
    let tasks = FakeTaskRepository {
        rows: vec![task("u1", "t1", "inbox zero")],
        ..Default::default()
    };
    let tags = FakeTagRepository {
        rows: vec![tag("u1", "g1", "errands")],
    };
    let service = build_service(changelog, tasks, tags);

    let result = service.sync("u1", 0).expect("sync");

    assert_eq!(result.latest_change_id, 2);
    assert_eq!(result.tasks.expect("tasks")[0].id, "t1");
    assert_eq!(result.tags.expect("tags")[0].id, "g1");
}

#[test]
fn never_returns_other_users_state() {
    let changelog = FakeChangeLog {
        records: vec![
            record("u2", 1, ChangeEntity::Task, "t-other", ChangeOperation::Create),
            record("u1", 1, ChangeEntity::Task, "t-mine", ChangeOperation::Create),
        ],
    };
    let tasks = FakeTaskRepository {
        rows: vec![task("u2", "t-other", "secret"), task("u1", "t-mine", "mine")],
        ..Default::default()
    };
    let service = build_service(changelog, tasks, FakeTagRepository::default());

    let result = service.sync("u1", 0).expect("sync");

    let returned = result.tasks.expect("tasks");
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].id, "t-mine");
}

#[test]
fn deleted_entity_is_omitted_but_advances_cursor() {
    let changelog = FakeChangeLog {
        records: vec![
            record("u1", 1, ChangeEntity::Task, "t1", ChangeOperation::Create),
            record("u1", 2, ChangeEntity::Task, "t1", ChangeOperation::Delete),
        ],
    };
    // No row for t1: it was deleted.
    let service = build_service(
        changelog,
        FakeTaskRepository::default(),
        FakeTagRepository::default(),
    );

    let result = service.sync("u1", 0).expect("sync");

    assert_eq!(result.latest_change_id, 2);
    assert!(result.tasks.is_none());
}

#[test]
fn foreign_rows_from_a_broken_repository_are_excluded() {
    let changelog = FakeChangeLog {
        records: vec![record(
            "u1",
            1,
            ChangeEntity::Task,
            "t1",
            ChangeOperation::Create,
        )],
    };
    // Same entity id exists for another user and the repository leaks it.
    let tasks = FakeTaskRepository {
        rows: vec![task("u2", "t1", "not yours")],
        leak_foreign_rows: true,
    };
    let service = build_service(changelog, tasks, FakeTagRepository::default());

    let result = service.sync("u1", 0).expect("sync");

    assert!(result.tasks.is_none(), "leaked row must never reach the client");
    assert_eq!(result.latest_change_id, 1);
}

#[test]
fn parse_cursor_accepts_absent_blank_and_integers() {
    assert_eq!(parse_cursor(None).expect("absent"), 0);
    assert_eq!(parse_cursor(Some("")).expect("blank"), 0);
    assert_eq!(parse_cursor(Some("  ")).expect("whitespace"), 0);
    assert_eq!(parse_cursor(Some("42")).expect("integer"), 42);
}

#[test]
fn parse_cursor_rejects_garbage_and_negatives() {
    assert!(parse_cursor(Some("abc")).is_err());
    assert!(parse_cursor(Some("-1")).is_err());
    assert!(parse_cursor(Some("1.5")).is_err());
}

#[test]
fn sync_result_serialization_omits_empty_groups() {
    let result = SyncResult {
        latest_change_id: 5,
        tasks: Some(vec![task("u1", "t1", "ship it")]),
        tags: None,
        spaces: None,
        repetitive_task_templates: None,
    };

    let json = serde_json::to_value(&result).expect("serialize");
    let object = json.as_object().expect("object");

    assert_eq!(object["latestChangeId"], 5);
    assert!(object.contains_key("tasks"));
    assert!(!object.contains_key("tags"));
    assert!(!object.contains_key("spaces"));
    assert!(!object.contains_key("repetitiveTaskTemplates"));
}
