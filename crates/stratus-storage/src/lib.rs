//! Object store implementations: S3-compatible and in-memory.

pub mod memory;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

use std::sync::Arc;

use tracing::info;

use stratus_core::config::storage::StorageConfig;
use stratus_core::error::AppError;
use stratus_core::result::AppResult;
use stratus_core::traits::ObjectStore;

/// Build the configured object store provider.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "s3" => Arc::new(s3::S3ObjectStore::new(&config.s3).await?),
        "memory" => Arc::new(memory::MemoryObjectStore::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'. Expected 's3' or 'memory'"
            )));
        }
    };
    info!(provider = store.provider_type(), "Object store initialized");
    Ok(store)
}
