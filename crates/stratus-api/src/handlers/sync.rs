//! Reconciliation trigger handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::SyncResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/sync
///
/// Runs one reconciliation pass attributed to the caller. Per-key
/// failures are log-only; the response reports the addition count.
pub async fn run_sync(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SyncResponse>, ApiError> {
    let report = state.sync_engine.run(auth.user_id).await?;
    Ok(Json(SyncResponse {
        message: "Sync complete".to_string(),
        added: report.added,
    }))
}
