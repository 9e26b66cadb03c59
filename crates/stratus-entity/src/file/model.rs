//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Default content type for files whose type cannot be recovered
/// (reconciliation infers files from a bare key listing).
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file record backed by an object in the object store.
///
/// `storage_key` equals `<canonical path of folder_id><name>` at
/// creation time. This is the binding contract between metadata and
/// storage; a metadata-only rename leaves it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The folder containing this file (null for bucket root).
    pub folder_id: Option<Uuid>,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type of the file.
    pub content_type: String,
    /// Key of the backing object. Unique among live files.
    pub storage_key: String,
    /// The file owner.
    pub owner_id: Uuid,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp; null means live.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    /// Check if this file is in the recycle bin.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The folder to place the file in (None for bucket root).
    pub folder_id: Option<Uuid>,
    /// The file name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type.
    pub content_type: String,
    /// Key of the backing object.
    pub storage_key: String,
    /// The file owner.
    pub owner_id: Uuid,
}
