//! Tag domain model, repository contract, and service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;

/// A user-scoped label that can be attached to tasks by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTag {
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
}

#[async_trait]
pub trait TagRepositoryTrait: Send + Sync {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>>;
    fn get_tag(&self, user_id: &str, tag_id: &str) -> Result<Tag>;
    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Tag>>;
    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag>;
    async fn update_tag(&self, update: TagUpdate) -> Result<Tag>;
    async fn delete_tag(&self, user_id: String, tag_id: String) -> Result<usize>;
}

#[async_trait]
pub trait TagServiceTrait: Send + Sync {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>>;
    fn get_tag(&self, user_id: &str, tag_id: &str) -> Result<Tag>;
    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag>;
    async fn update_tag(&self, update: TagUpdate) -> Result<Tag>;
    async fn delete_tag(&self, user_id: String, tag_id: String) -> Result<usize>;
}

#[derive(Clone)]
pub struct TagService {
    tag_repository: Arc<dyn TagRepositoryTrait>,
}

impl TagService {
    pub fn new(tag_repository: Arc<dyn TagRepositoryTrait>) -> Self {
        Self { tag_repository }
    }
}

#[async_trait]
impl TagServiceTrait for TagService {
    fn list_tags(&self, user_id: &str) -> Result<Vec<Tag>> {
        self.tag_repository.list_tags(user_id)
    }

    fn get_tag(&self, user_id: &str, tag_id: &str) -> Result<Tag> {
        self.tag_repository.get_tag(user_id, tag_id)
    }

    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag> {
        self.tag_repository.create_tag(new_tag).await
    }

    async fn update_tag(&self, update: TagUpdate) -> Result<Tag> {
        self.tag_repository.update_tag(update).await
    }

    async fn delete_tag(&self, user_id: String, tag_id: String) -> Result<usize> {
        self.tag_repository.delete_tag(user_id, tag_id).await
    }
}
