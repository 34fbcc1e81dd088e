//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let storage = match &state.db {
        None => "memory",
        Some(db) => match db.health_check().await {
            Ok(true) => "connected",
            _ => "unreachable",
        },
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if storage == "unreachable" { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
    }))
}
