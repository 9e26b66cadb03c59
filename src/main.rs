//! Stratus Drive Server — cloud file manager backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing_subscriber::{EnvFilter, fmt};

use stratus_core::config::AppConfig;
use stratus_core::error::AppError;
use stratus_service::sync::SyncEngine;

#[tokio::main]
async fn main() {
    let env = std::env::var("STRATUS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Stratus Drive v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    tracing::info!("Connecting to database...");
    let db_pool = stratus_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    stratus_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Object store ─────────────────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing object store...");
    let objects = stratus_storage::build_object_store(&config.storage).await?;

    // ── Repositories ─────────────────────────────────────────────
    let folder_repo =
        stratus_database::repositories::folder::FolderRepository::new(db_pool.clone());
    let file_repo = stratus_database::repositories::file::FileRepository::new(db_pool.clone());

    // Trait-object views over the same repositories for the
    // reconciliation core.
    let folder_store: Arc<dyn stratus_service::metadata::FolderStore> =
        Arc::new(folder_repo.clone());
    let file_store: Arc<dyn stratus_service::metadata::FileStore> = Arc::new(file_repo.clone());

    // ── Services ─────────────────────────────────────────────────
    let folder_service = Arc::new(stratus_service::folder::FolderService::new(
        folder_repo.clone(),
        Arc::clone(&objects),
    ));
    let file_service = Arc::new(stratus_service::file::FileService::new(
        file_repo.clone(),
        folder_repo.clone(),
        Arc::clone(&objects),
    ));
    let trash_service = Arc::new(stratus_service::trash::TrashService::new(
        folder_repo.clone(),
        file_repo.clone(),
    ));
    let purge_service = Arc::new(stratus_service::trash::PurgeService::new(
        Arc::clone(&objects),
        Arc::clone(&folder_store),
        Arc::clone(&file_store),
    ));
    let sync_engine = Arc::new(SyncEngine::new(
        Arc::clone(&objects),
        Arc::clone(&folder_store),
        Arc::clone(&file_store),
    ));

    // ── Scheduled reconciliation ─────────────────────────────────
    let scheduler = start_sync_scheduler(&config, Arc::clone(&sync_engine)).await?;

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = stratus_api::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        folder_service,
        file_service,
        trash_service,
        purge_service,
        sync_engine,
    };

    let app = stratus_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Stratus Drive server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(mut scheduler) = scheduler {
        let _ = scheduler.shutdown().await;
    }

    tracing::info!("Stratus Drive server shut down gracefully");
    Ok(())
}

/// Start the cron-driven reconciliation when a schedule is configured.
///
/// Scheduled runs carry no request identity, so rows they create are
/// attributed to the configured system owner.
async fn start_sync_scheduler(
    config: &AppConfig,
    engine: Arc<SyncEngine>,
) -> Result<Option<JobScheduler>, AppError> {
    if config.sync.schedule.is_empty() {
        tracing::info!("Scheduled reconciliation disabled");
        return Ok(None);
    }

    let Some(owner_id) = config.sync.system_owner_id else {
        return Err(AppError::configuration(
            "sync.system_owner_id is required when sync.schedule is set",
        ));
    };

    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

    let job = CronJob::new_async(config.sync.schedule.as_str(), move |_uuid, _lock| {
        let engine = Arc::clone(&engine);
        Box::pin(async move {
            match engine.run(owner_id).await {
                Ok(report) => {
                    tracing::info!(
                        added = report.added,
                        pruned_files = report.pruned_files,
                        pruned_folders = report.pruned_folders,
                        "Scheduled reconciliation finished"
                    );
                }
                Err(e) => tracing::error!("Scheduled reconciliation failed: {e}"),
            }
        })
    })
    .map_err(|e| AppError::configuration(format!("Invalid sync schedule: {e}")))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| AppError::internal(format!("Failed to register sync job: {e}")))?;
    scheduler
        .start()
        .await
        .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

    tracing::info!(schedule = %config.sync.schedule, "Scheduled reconciliation enabled");
    Ok(Some(scheduler))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
