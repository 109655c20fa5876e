//! Tag CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use taskdeck_core::tags::{NewTag, Tag, TagUpdate};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    pub name: String,
    pub color: Option<String>,
}

async fn list_tags(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tag_service.list_tags(&user_id)?))
}

async fn create_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Tag name must not be empty".to_string()));
    }

    let tag = state
        .tag_service
        .create_tag(NewTag {
            user_id,
            name: body.name,
            color: body.color,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn get_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tag_id): Path<String>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.tag_service.get_tag(&user_id, &tag_id)?))
}

async fn update_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tag_id): Path<String>,
    Json(body): Json<UpdateTagRequest>,
) -> ApiResult<Json<Tag>> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Tag name must not be empty".to_string()));
    }

    let tag = state
        .tag_service
        .update_tag(TagUpdate {
            id: tag_id,
            user_id,
            name: body.name,
            color: body.color,
        })
        .await?;
    Ok(Json(tag))
}

async fn delete_tag(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(tag_id): Path<String>,
) -> ApiResult<StatusCode> {
    let affected = state.tag_service.delete_tag(user_id, tag_id.clone()).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!("Tag {} not found", tag_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route(
            "/tags/{tag_id}",
            get(get_tag).put(update_tag).delete(delete_tag),
        )
}
