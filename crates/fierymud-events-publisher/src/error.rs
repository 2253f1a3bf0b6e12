//! Publisher lifecycle errors.

use fierymud_events_core::error::ConfigError;
use thiserror::Error;

/// Errors returned by publisher lifecycle operations.
///
/// Individual publishes never fail; these cover only initialization.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// The configuration could not be built.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker thread could not be started.
    #[error("failed to spawn publisher worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The publisher was shut down and cannot be restarted.
    #[error("publisher has been shut down")]
    AlreadyShutDown,
}
