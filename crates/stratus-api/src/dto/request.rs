//! Request body and query DTOs.

use serde::Deserialize;
use uuid::Uuid;

use stratus_core::types::ItemKind;

/// POST /api/folders
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// PUT /api/folders/{id} and PUT /api/files/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// GET /api/folders query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFoldersParams {
    pub parent_id: Option<Uuid>,
}

/// GET /api/files query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFilesParams {
    pub folder_id: Option<Uuid>,
}

/// POST /api/files/upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlRequest {
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub folder_id: Option<Uuid>,
}

/// GET /api/files/{id}/download query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub preview: bool,
}

/// POST /api/trash/restore and POST /api/trash/purge
#[derive(Debug, Clone, Deserialize)]
pub struct TrashItemRequest {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}
