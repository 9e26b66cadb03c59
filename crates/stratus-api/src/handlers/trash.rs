//! Recycle-bin handlers.

use axum::Json;
use axum::extract::State;

use stratus_service::trash::TrashItem;

use crate::dto::request::TrashItemRequest;
use crate::dto::response::{ApiResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/trash
pub async fn list_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TrashItem>>>, ApiError> {
    let items = state.trash_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// POST /api/trash/restore
pub async fn restore_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TrashItemRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.trash_service.restore(&auth, req.kind, req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/trash/purge
pub async fn purge_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TrashItemRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.purge_service.purge(&auth, req.kind, req.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
