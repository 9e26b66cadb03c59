//! Object store trait for pluggable storage backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Maximum number of keys accepted by a single batch delete call.
///
/// This mirrors the S3 `DeleteObjects` limit; callers chunk larger sets.
pub const MAX_DELETE_BATCH: usize = 1000;

/// One entry in an object inventory listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObjectEntry {
    /// Flat string key. A trailing `/` marks an explicit folder marker.
    pub key: String,
    /// Object size in bytes (0 for folder markers).
    pub size: i64,
}

/// How a presigned download should be rendered by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Render inline (previews).
    Inline,
    /// Download as an attachment with the given file name.
    Attachment,
}

/// Trait for object storage backends.
///
/// The [`ObjectStore`] trait is defined here in `stratus-core` and
/// implemented in `stratus-storage` (S3-compatible and in-memory).
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// List every object whose key starts with `prefix`, transparently
    /// paginating until the listing is exhausted. An empty prefix
    /// returns the full bucket inventory.
    async fn list_objects(&self, prefix: &str) -> AppResult<Vec<ObjectEntry>>;

    /// Write an object at the given key.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> AppResult<()>;

    /// Delete a single object. Deleting an absent key is a no-op.
    async fn delete_object(&self, key: &str) -> AppResult<()>;

    /// Delete up to [`MAX_DELETE_BATCH`] objects in one call.
    /// Absent keys are ignored; callers chunk larger sets.
    async fn delete_objects(&self, keys: &[String]) -> AppResult<()>;

    /// Issue a presigned download URL for the given key.
    async fn presign_get(
        &self,
        key: &str,
        file_name: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> AppResult<String>;

    /// Issue a presigned upload URL for the given key.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String>;
}
