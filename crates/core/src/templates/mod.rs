//! Repetitive task template domain model, repository contract, and service.
//!
//! Templates describe recurring tasks; `recurrence_rule` carries an
//! RFC 5545 RRULE string that clients expand locally. The server only
//! stores and syncs templates, it never materializes task instances.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepetitiveTaskTemplate {
    pub id: String,
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub is_paused: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepetitiveTaskTemplate {
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepetitiveTaskTemplateUpdate {
    pub id: String,
    pub user_id: String,
    pub space_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub is_paused: bool,
}

#[async_trait]
pub trait RepetitiveTaskTemplateRepositoryTrait: Send + Sync {
    fn list_templates(&self, user_id: &str) -> Result<Vec<RepetitiveTaskTemplate>>;
    fn get_template(&self, user_id: &str, template_id: &str) -> Result<RepetitiveTaskTemplate>;
    fn fetch_by_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<RepetitiveTaskTemplate>>;
    async fn create_template(
        &self,
        new_template: NewRepetitiveTaskTemplate,
    ) -> Result<RepetitiveTaskTemplate>;
    async fn update_template(
        &self,
        update: RepetitiveTaskTemplateUpdate,
    ) -> Result<RepetitiveTaskTemplate>;
    async fn delete_template(&self, user_id: String, template_id: String) -> Result<usize>;
}

#[async_trait]
pub trait RepetitiveTaskTemplateServiceTrait: Send + Sync {
    fn list_templates(&self, user_id: &str) -> Result<Vec<RepetitiveTaskTemplate>>;
    fn get_template(&self, user_id: &str, template_id: &str) -> Result<RepetitiveTaskTemplate>;
    async fn create_template(
        &self,
        new_template: NewRepetitiveTaskTemplate,
    ) -> Result<RepetitiveTaskTemplate>;
    async fn update_template(
        &self,
        update: RepetitiveTaskTemplateUpdate,
    ) -> Result<RepetitiveTaskTemplate>;
    async fn delete_template(&self, user_id: String, template_id: String) -> Result<usize>;
}

#[derive(Clone)]
pub struct RepetitiveTaskTemplateService {
    template_repository: Arc<dyn RepetitiveTaskTemplateRepositoryTrait>,
}

impl RepetitiveTaskTemplateService {
    pub fn new(template_repository: Arc<dyn RepetitiveTaskTemplateRepositoryTrait>) -> Self {
        Self {
            template_repository,
        }
    }
}

#[async_trait]
impl RepetitiveTaskTemplateServiceTrait for RepetitiveTaskTemplateService {
    fn list_templates(&self, user_id: &str) -> Result<Vec<RepetitiveTaskTemplate>> {
        self.template_repository.list_templates(user_id)
    }

    fn get_template(&self, user_id: &str, template_id: &str) -> Result<RepetitiveTaskTemplate> {
        self.template_repository.get_template(user_id, template_id)
    }

    async fn create_template(
        &self,
        new_template: NewRepetitiveTaskTemplate,
    ) -> Result<RepetitiveTaskTemplate> {
        self.template_repository.create_template(new_template).await
    }

    async fn update_template(
        &self,
        update: RepetitiveTaskTemplateUpdate,
    ) -> Result<RepetitiveTaskTemplate> {
        self.template_repository.update_template(update).await
    }

    async fn delete_template(&self, user_id: String, template_id: String) -> Result<usize> {
        self.template_repository
            .delete_template(user_id, template_id)
            .await
    }
}
