//! Shared application state.

use std::sync::Arc;

use fierymud_events_core::clock::Clock;
use fierymud_events_publisher::EventPublisher;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide event publisher.
    pub publisher: Arc<EventPublisher>,
    /// Clock used to stamp events submitted over HTTP.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(publisher: Arc<EventPublisher>, clock: Arc<dyn Clock>) -> Self {
        Self { publisher, clock }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("publisher", &self.publisher)
            .finish_non_exhaustive()
    }
}
