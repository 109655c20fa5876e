//! Space domain model, repository contract, and service.
//!
//! Spaces are the top-level containers tasks and templates are filed under.
//! Deleting a space does not cascade here; clients reconcile orphaned
//! `space_id` references on their side after sync.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpace {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceUpdate {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

#[async_trait]
pub trait SpaceRepositoryTrait: Send + Sync {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>>;
    fn get_space(&self, user_id: &str, space_id: &str) -> Result<Space>;
    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<Space>>;
    async fn create_space(&self, new_space: NewSpace) -> Result<Space>;
    async fn update_space(&self, update: SpaceUpdate) -> Result<Space>;
    async fn delete_space(&self, user_id: String, space_id: String) -> Result<usize>;
}

#[async_trait]
pub trait SpaceServiceTrait: Send + Sync {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>>;
    fn get_space(&self, user_id: &str, space_id: &str) -> Result<Space>;
    async fn create_space(&self, new_space: NewSpace) -> Result<Space>;
    async fn update_space(&self, update: SpaceUpdate) -> Result<Space>;
    async fn delete_space(&self, user_id: String, space_id: String) -> Result<usize>;
}

#[derive(Clone)]
pub struct SpaceService {
    space_repository: Arc<dyn SpaceRepositoryTrait>,
}

impl SpaceService {
    pub fn new(space_repository: Arc<dyn SpaceRepositoryTrait>) -> Self {
        Self { space_repository }
    }
}

#[async_trait]
impl SpaceServiceTrait for SpaceService {
    fn list_spaces(&self, user_id: &str) -> Result<Vec<Space>> {
        self.space_repository.list_spaces(user_id)
    }

    fn get_space(&self, user_id: &str, space_id: &str) -> Result<Space> {
        self.space_repository.get_space(user_id, space_id)
    }

    async fn create_space(&self, new_space: NewSpace) -> Result<Space> {
        self.space_repository.create_space(new_space).await
    }

    async fn update_space(&self, update: SpaceUpdate) -> Result<Space> {
        self.space_repository.update_space(update).await
    }

    async fn delete_space(&self, user_id: String, space_id: String) -> Result<usize> {
        self.space_repository.delete_space(user_id, space_id).await
    }
}
