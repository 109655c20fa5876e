//! Incremental sync endpoint.
//!
//! Clients call `GET /sync?lastChangeId=N` with their stored cursor and
//! apply the returned entity groups wholesale; the response's
//! `latestChangeId` becomes the cursor for the next call.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use taskdeck_core::sync::{parse_cursor, SyncResult};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncQuery {
    last_change_id: Option<String>,
}

async fn get_changes(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<SyncQuery>,
) -> ApiResult<Json<SyncResult>> {
    let cursor = parse_cursor(query.last_change_id.as_deref())?;
    debug!("Sync request for user {} from cursor {}", user_id, cursor);
    let result = state.sync_service.sync(&user_id, cursor)?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sync", get(get_changes))
}
