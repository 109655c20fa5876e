//! Application state, wiring, and the serve loop.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use taskdeck_core::spaces::{SpaceService, SpaceServiceTrait};
use taskdeck_core::sync::{SyncService, SyncServiceTrait};
use taskdeck_core::tags::{TagService, TagServiceTrait};
use taskdeck_core::tasks::{TaskService, TaskServiceTrait};
use taskdeck_core::templates::{RepetitiveTaskTemplateService, RepetitiveTaskTemplateServiceTrait};
use taskdeck_storage_sqlite::db::{create_pool, init, run_migrations, spawn_writer};
use taskdeck_storage_sqlite::{
    ChangeLogRepository, RepetitiveTaskTemplateRepository, SpaceRepository, TagRepository,
    TaskRepository,
};

use crate::api;
use crate::config::ServerConfig;

pub struct AppState {
    pub task_service: Arc<dyn TaskServiceTrait>,
    pub tag_service: Arc<dyn TagServiceTrait>,
    pub space_service: Arc<dyn SpaceServiceTrait>,
    pub template_service: Arc<dyn RepetitiveTaskTemplateServiceTrait>,
    pub sync_service: Arc<dyn SyncServiceTrait>,
}

/// Open the database, start the writer, and wire repositories into services.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let db_path = init(&config.data_dir)?;
    run_migrations(&db_path)?;
    let pool = create_pool(&db_path)?;
    let writer = spawn_writer(pool.as_ref().clone());

    let task_repository = Arc::new(TaskRepository::new(pool.clone(), writer.clone()));
    let tag_repository = Arc::new(TagRepository::new(pool.clone(), writer.clone()));
    let space_repository = Arc::new(SpaceRepository::new(pool.clone(), writer.clone()));
    let template_repository = Arc::new(RepetitiveTaskTemplateRepository::new(pool.clone(), writer));
    let changelog_repository = Arc::new(ChangeLogRepository::new(pool));

    let sync_service = Arc::new(SyncService::new(
        changelog_repository,
        task_repository.clone(),
        tag_repository.clone(),
        space_repository.clone(),
        template_repository.clone(),
    ));

    Ok(AppState {
        task_service: Arc::new(TaskService::new(task_repository)),
        tag_service: Arc::new(TagService::new(tag_repository)),
        space_service: Arc::new(SpaceService::new(space_repository)),
        template_service: Arc::new(RepetitiveTaskTemplateService::new(template_repository)),
        sync_service,
    })
}

/// Assemble the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new().nest("/api/v1", api::router()).with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(build_state(&config)?);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("taskdeck server listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
