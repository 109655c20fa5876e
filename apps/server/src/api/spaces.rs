//! Space CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use taskdeck_core::spaces::{NewSpace, Space, SpaceUpdate};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    pub name: String,
}

async fn list_spaces(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Space>>> {
    Ok(Json(state.space_service.list_spaces(&user_id)?))
}

async fn create_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateSpaceRequest>,
) -> ApiResult<(StatusCode, Json<Space>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Space name must not be empty".to_string()));
    }

    let space = state
        .space_service
        .create_space(NewSpace {
            user_id,
            name: body.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(space)))
}

async fn get_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(space_id): Path<String>,
) -> ApiResult<Json<Space>> {
    Ok(Json(state.space_service.get_space(&user_id, &space_id)?))
}

async fn update_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(space_id): Path<String>,
    Json(body): Json<UpdateSpaceRequest>,
) -> ApiResult<Json<Space>> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Space name must not be empty".to_string()));
    }

    let space = state
        .space_service
        .update_space(SpaceUpdate {
            id: space_id,
            user_id,
            name: body.name,
        })
        .await?;
    Ok(Json(space))
}

async fn delete_space(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(space_id): Path<String>,
) -> ApiResult<StatusCode> {
    let affected = state
        .space_service
        .delete_space(user_id, space_id.clone())
        .await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!("Space {} not found", space_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/spaces", get(list_spaces).post(create_space))
        .route(
            "/spaces/{space_id}",
            get(get_space).put(update_space).delete(delete_space),
        )
}
