//! Task CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use taskdeck_core::tasks::{NewTask, Task, TaskUpdate};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub space_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<String>,
    pub space_id: Option<String>,
    pub is_done: bool,
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.task_service.list_tasks(&user_id)?))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Task title must not be empty".to_string()));
    }

    let task = state
        .task_service
        .create_task(NewTask {
            user_id,
            space_id: body.space_id,
            title: body.title,
            description: body.description,
            due_at: body.due_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.task_service.get_task(&user_id, &task_id)?))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    if body.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Task title must not be empty".to_string()));
    }

    let task = state
        .task_service
        .update_task(TaskUpdate {
            id: task_id,
            user_id,
            space_id: body.space_id,
            title: body.title,
            description: body.description,
            due_at: body.due_at,
            is_done: body.is_done,
        })
        .await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    let affected = state
        .task_service
        .delete_task(user_id, task_id.clone())
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!("Task {} not found", task_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
