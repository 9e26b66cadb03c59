//! Response DTOs.

use serde::Serialize;

/// Generic success envelope wrapping a payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Bare success acknowledgement (purge, restore, deletes).
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// POST /api/sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub added: u64,
}

/// GET /api/files/{id}/download
#[derive(Debug, Clone, Serialize)]
pub struct DownloadUrlResponse {
    pub url: String,
}

/// GET /api/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
