//! Broker transport abstraction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PublisherConfig;
use crate::error::TransportError;

/// Shared, lock-free view of whether a transport currently holds a live
/// connection.
///
/// The transport itself is owned by the publisher worker; clones of this
/// handle let other threads report liveness without touching the
/// connection.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus(Arc<AtomicBool>);

impl ConnectionStatus {
    /// Creates a handle in the disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the owning transport is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Records a connection state change.
    pub fn set_connected(&self, connected: bool) {
        self.0.store(connected, Ordering::Release);
    }
}

/// A link to a publish/subscribe broker.
///
/// Implementations are driven from a single thread (the publisher worker) and
/// never shared; only the [`ConnectionStatus`] handle crosses threads.
pub trait Transport: Send {
    /// Opens a connection, authenticating if a password is configured.
    /// Replaces any existing connection. On failure, nothing partially
    /// acquired is kept.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the broker is unreachable, the connect
    /// timeout elapses or authentication is rejected.
    fn connect(&mut self, config: &PublisherConfig) -> Result<(), TransportError>;

    /// Releases the connection if there is one. Safe to call repeatedly.
    fn disconnect(&mut self);

    /// Issues a single publish of `payload` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` for any failure: no connection, timeout,
    /// reset, protocol error or an unexpected reply.
    fn publish(&mut self, channel: &str, payload: &str) -> Result<(), TransportError>;

    /// Returns the liveness handle for this transport.
    fn status(&self) -> &ConnectionStatus;

    /// Returns whether a connection is currently held. Performs no I/O.
    fn is_connected(&self) -> bool {
        self.status().is_connected()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, config: &PublisherConfig) -> Result<(), TransportError> {
        (**self).connect(config)
    }

    fn disconnect(&mut self) {
        (**self).disconnect();
    }

    fn publish(&mut self, channel: &str, payload: &str) -> Result<(), TransportError> {
        (**self).publish(channel, payload)
    }

    fn status(&self) -> &ConnectionStatus {
        (**self).status()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
