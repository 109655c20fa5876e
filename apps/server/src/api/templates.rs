//! Repetitive task template CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use taskdeck_core::templates::{
    NewRepetitiveTaskTemplate, RepetitiveTaskTemplate, RepetitiveTaskTemplateUpdate,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub space_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub title: String,
    pub description: Option<String>,
    pub recurrence_rule: String,
    pub next_due_at: Option<String>,
    pub space_id: Option<String>,
    pub is_paused: bool,
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<RepetitiveTaskTemplate>>> {
    Ok(Json(state.template_service.list_templates(&user_id)?))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<RepetitiveTaskTemplate>)> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Template title must not be empty".to_string()));
    }
    if body.recurrence_rule.trim().is_empty() {
        return Err(ApiError::BadRequest("Recurrence rule must not be empty".to_string()));
    }

    let template = state
        .template_service
        .create_template(NewRepetitiveTaskTemplate {
            user_id,
            space_id: body.space_id,
            title: body.title,
            description: body.description,
            recurrence_rule: body.recurrence_rule,
            next_due_at: body.next_due_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(template_id): Path<String>,
) -> ApiResult<Json<RepetitiveTaskTemplate>> {
    Ok(Json(
        state.template_service.get_template(&user_id, &template_id)?,
    ))
}

async fn update_template(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(template_id): Path<String>,
    Json(body): Json<UpdateTemplateRequest>,
) -> ApiResult<Json<RepetitiveTaskTemplate>> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Template title must not be empty".to_string()));
    }
    if body.recurrence_rule.trim().is_empty() {
        return Err(ApiError::BadRequest("Recurrence rule must not be empty".to_string()));
    }

    let template = state
        .template_service
        .update_template(RepetitiveTaskTemplateUpdate {
            id: template_id,
            user_id,
            space_id: body.space_id,
            title: body.title,
            description: body.description,
            recurrence_rule: body.recurrence_rule,
            next_due_at: body.next_due_at,
            is_paused: body.is_paused,
        })
        .await?;
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(template_id): Path<String>,
) -> ApiResult<StatusCode> {
    let affected = state
        .template_service
        .delete_template(user_id, template_id.clone())
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!(
            "Repetitive task template {} not found",
            template_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/repetitive-task-templates",
            get(list_templates).post(create_template),
        )
        .route(
            "/repetitive-task-templates/{template_id}",
            get(get_template).put(update_template).delete(delete_template),
        )
}
