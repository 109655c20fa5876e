//! Task domain model, repository contract, and service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;

/// A task owned by one user, optionally filed under a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
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

/// Input for creating a task. The repository mints id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
}

/// Full-row update for a task. Scoped to `user_id`; updating another user's
/// task is a not-found, never a cross-user write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: String,
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub is_done: bool,
}

/// Task persistence contract implemented by the storage crate.
///
/// Writes are async because they flow through the single-writer actor; each
/// write appends the matching change record inside its own transaction.
#[async_trait]
pub trait TaskRepositoryTrait: Send + Sync {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;
    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Task>;
    /// Current rows for the given ids, scoped to `user_id`. Missing ids are
    /// simply absent from the result.
    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Task>>;
    async fn create_task(&self, new_task: NewTask) -> Result<Task>;
    async fn update_task(&self, update: TaskUpdate) -> Result<Task>;
    /// Returns the number of rows removed (0 when the task did not exist).
    async fn delete_task(&self, user_id: String, task_id: String) -> Result<usize>;
}

#[async_trait]
pub trait TaskServiceTrait: Send + Sync {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;
    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Task>;
    async fn create_task(&self, new_task: NewTask) -> Result<Task>;
    async fn update_task(&self, update: TaskUpdate) -> Result<Task>;
    async fn delete_task(&self, user_id: String, task_id: String) -> Result<usize>;
}

/// Thin service over the task repository, used by the HTTP layer.
#[derive(Clone)]
pub struct TaskService {
    task_repository: Arc<dyn TaskRepositoryTrait>,
}

impl TaskService {
    pub fn new(task_repository: Arc<dyn TaskRepositoryTrait>) -> Self {
        Self { task_repository }
    }
}

#[async_trait]
impl TaskServiceTrait for TaskService {
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.task_repository.list_tasks(user_id)
    }

    fn get_task(&self, user_id: &str, task_id: &str) -> Result<Task> {
        self.task_repository.get_task(user_id, task_id)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        self.task_repository.create_task(new_task).await
    }

    async fn update_task(&self, update: TaskUpdate) -> Result<Task> {
        self.task_repository.update_task(update).await
    }

    async fn delete_task(&self, user_id: String, task_id: String) -> Result<usize> {
        self.task_repository.delete_task(user_id, task_id).await
    }
}
