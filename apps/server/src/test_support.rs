//! Test scaffolding: a full application router over a throwaway database.

use std::sync::Arc;

use axum::Router;

use crate::config::ServerConfig;
use crate::main_lib::{app, build_state};

pub(crate) fn test_app() -> Router {
    let data_dir = tempfile::tempdir()
        .expect("tempdir")
        .keep()
        .to_string_lossy()
        .to_string();
    let config = ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        data_dir,
    };
    let state = Arc::new(build_state(&config).expect("build state"));
    app(state)
}
