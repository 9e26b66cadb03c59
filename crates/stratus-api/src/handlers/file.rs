//! File handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use stratus_entity::file::File;
use stratus_service::file::{UploadRequest, UploadTicket};

use crate::dto::request::{DownloadParams, ListFilesParams, RenameRequest, UploadUrlRequest};
use crate::dto::response::{ApiResponse, DownloadUrlResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/files?folder_id=...
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListFilesParams>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.file_service.list(&auth, params.folder_id).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// POST /api/files/upload
pub async fn request_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UploadUrlRequest>,
) -> Result<Json<ApiResponse<UploadTicket>>, ApiError> {
    let ticket = state
        .file_service
        .request_upload(
            &auth,
            &UploadRequest {
                file_name: req.filename,
                content_type: req.content_type,
                size: req.size,
                folder_id: req.folder_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// GET /api/files/{id}/download?preview=bool
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DownloadParams>,
) -> Result<Json<DownloadUrlResponse>, ApiError> {
    let url = state
        .file_service
        .download_url(&auth, id, params.preview)
        .await?;
    Ok(Json(DownloadUrlResponse { url }))
}

/// PUT /api/files/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.file_service.rename(&auth, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.trash_service.delete_file(&auth, id).await?;
    Ok(Json(SuccessResponse::ok()))
}
