//! HTTP API modules and the combined router.

pub mod health;
pub mod spaces;
pub mod sync;
pub mod tags;
pub mod tasks;
pub mod templates;

use std::sync::Arc;

use axum::Router;

use crate::main_lib::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(sync::router())
        .merge(tasks::router())
        .merge(tags::router())
        .merge(spaces::router())
        .merge(templates::router())
}
