//! HTTP surface of the FieryMUD event relay.
//!
//! Exposes publisher health and statistics to operators and lets
//! out-of-process game components submit events over HTTP.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the relay router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/stats", routes::stats::router())
        .nest("/api/v1/events", routes::events::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
