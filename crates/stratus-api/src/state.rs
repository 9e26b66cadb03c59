//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use stratus_core::config::AppConfig;
use stratus_service::file::FileService;
use stratus_service::folder::FolderService;
use stratus_service::sync::SyncEngine;
use stratus_service::trash::{PurgeService, TrashService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db_pool: PgPool,
    /// Folder service.
    pub folder_service: Arc<FolderService>,
    /// File service.
    pub file_service: Arc<FileService>,
    /// Recycle-bin service.
    pub trash_service: Arc<TrashService>,
    /// Permanent-delete orchestrator.
    pub purge_service: Arc<PurgeService>,
    /// Storage-metadata reconciliation engine.
    pub sync_engine: Arc<SyncEngine>,
}
