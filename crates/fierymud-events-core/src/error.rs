//! Error types shared by the relay crates.

use thiserror::Error;

/// Failure reported by a broker transport.
///
/// The publisher worker does not distinguish between variants; they exist so
/// that log lines say what went wrong.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connect(String),

    /// The broker rejected the configured credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A live connection failed to deliver a message.
    #[error("publish failed: {0}")]
    Publish(String),

    /// An operation that needs a connection was attempted without one.
    #[error("not connected")]
    NotConnected,

    /// The broker answered with something other than what was expected.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

/// Invalid publisher configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A port value could not be parsed as a `u16`.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// A broker URL could not be parsed.
    #[error("invalid broker url: {0:?}")]
    InvalidUrl(String),
}

/// A string did not name any known event category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);
