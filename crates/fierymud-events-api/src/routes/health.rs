//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response. The relay itself is healthy even while the broker is
/// unreachable; `publisher` says whether events are being accepted.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// `running`, `disabled` or `stopped`.
    pub publisher: &'static str,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let publisher = if state.publisher.is_running() {
        "running"
    } else if state.publisher.is_initialized() && !state.publisher.is_enabled() {
        "disabled"
    } else {
        "stopped"
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        publisher,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
