//! Health check handler.

use axum::Json;
use axum::extract::State;

use stratus_database::connection;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match connection::health_check(&state.db_pool).await {
        Ok(true) => "connected".to_string(),
        _ => "unreachable".to_string(),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}
