//! Publisher statistics endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use fierymud_events_publisher::PublisherStats;
use serde::Serialize;

use crate::state::AppState;

/// Response body for GET /api/v1/stats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Messages the broker accepted.
    pub events_published: u64,
    /// Messages lost for any reason.
    pub events_dropped: u64,
    /// Messages refused because the queue was full.
    pub dropped_queue_full: u64,
    /// Messages discarded because the broker was unreachable.
    pub dropped_connect_failed: u64,
    /// Messages the broker failed to accept.
    pub dropped_publish_failed: u64,
    /// Connection attempts made by the worker.
    pub reconnect_attempts: u64,
    /// Messages waiting to be published.
    pub queue_depth: usize,
    /// Whether the worker holds a broker connection.
    pub connected: bool,
    /// Whether publishing is enabled.
    pub enabled: bool,
}

impl StatsResponse {
    fn new(stats: PublisherStats, enabled: bool) -> Self {
        Self {
            events_published: stats.events_published,
            events_dropped: stats.events_dropped,
            dropped_queue_full: stats.dropped_queue_full,
            dropped_connect_failed: stats.dropped_connect_failed,
            dropped_publish_failed: stats.dropped_publish_failed,
            reconnect_attempts: stats.reconnect_attempts,
            queue_depth: stats.queue_depth,
            connected: stats.connected,
            enabled,
        }
    }
}

/// GET /api/v1/stats
async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.publisher.stats(),
        state.publisher.is_enabled(),
    ))
}

/// Returns the router for publisher statistics.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}
