use axum::extract::State;
use axum::{routing::get, Json, Router};
use bedwatch_core::backend::StatusBackend;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the storage backend is reachable.
    pub backend_healthy: bool,
}

/// GET /health -- returns service and backend health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_healthy = state.backend.ping().await.is_ok();

    let status = if backend_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        backend_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
