//! In-memory `Transport` doubles.
//!
//! Each transport owns a [`TransportLog`]; grab a clone with `log()` before
//! handing the transport to a publisher, then assert on it afterwards.

use std::sync::{Arc, Condvar, Mutex};

use fierymud_events_core::config::PublisherConfig;
use fierymud_events_core::error::TransportError;
use fierymud_events_core::transport::{ConnectionStatus, Transport};

/// A message a test transport accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    /// Channel it was published to.
    pub channel: String,
    /// Payload as published.
    pub payload: String,
}

#[derive(Debug, Default)]
struct LogState {
    connect_attempts: usize,
    connects: usize,
    disconnects: usize,
    published: Vec<PublishedMessage>,
}

/// Shared record of the calls made on a test transport.
#[derive(Debug, Clone, Default)]
pub struct TransportLog(Arc<Mutex<LogState>>);

impl TransportLog {
    /// Number of `connect` calls, successful or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn connect_attempts(&self) -> usize {
        self.0.lock().unwrap().connect_attempts
    }

    /// Number of successful `connect` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn connects(&self) -> usize {
        self.0.lock().unwrap().connects
    }

    /// Number of `disconnect` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn disconnects(&self) -> usize {
        self.0.lock().unwrap().disconnects
    }

    /// Snapshot of every accepted message, in publish order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.0.lock().unwrap().published.clone()
    }

    fn record_connect_attempt(&self) {
        self.0.lock().unwrap().connect_attempts += 1;
    }

    fn record_connect(&self) {
        self.0.lock().unwrap().connects += 1;
    }

    fn record_disconnect(&self) {
        self.0.lock().unwrap().disconnects += 1;
    }

    fn record_publish(&self, channel: &str, payload: &str) {
        self.0.lock().unwrap().published.push(PublishedMessage {
            channel: channel.to_owned(),
            payload: payload.to_owned(),
        });
    }
}

/// A transport that always connects and accepts every publish.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    log: TransportLog,
    status: ConnectionStatus,
}

impl RecordingTransport {
    /// Creates a disconnected recording transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to this transport's call log.
    #[must_use]
    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

impl Transport for RecordingTransport {
    fn connect(&mut self, _config: &PublisherConfig) -> Result<(), TransportError> {
        self.log.record_connect_attempt();
        self.log.record_connect();
        self.status.set_connected(true);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.log.record_disconnect();
        self.status.set_connected(false);
    }

    fn publish(&mut self, channel: &str, payload: &str) -> Result<(), TransportError> {
        if !self.status.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.log.record_publish(channel, payload);
        Ok(())
    }

    fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}

/// A transport whose `connect` always fails. Useful for testing broker
/// outages.
#[derive(Debug, Default)]
pub struct FailingTransport {
    log: TransportLog,
    status: ConnectionStatus,
}

impl FailingTransport {
    /// Creates a transport that can never connect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to this transport's call log.
    #[must_use]
    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

impl Transport for FailingTransport {
    fn connect(&mut self, _config: &PublisherConfig) -> Result<(), TransportError> {
        self.log.record_connect_attempt();
        Err(TransportError::Connect("connection refused".into()))
    }

    fn disconnect(&mut self) {
        self.log.record_disconnect();
    }

    fn publish(&mut self, _channel: &str, _payload: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}

/// A transport that connects normally but fails its first `failures`
/// publishes, then behaves like [`RecordingTransport`].
#[derive(Debug)]
pub struct FlakyTransport {
    inner: RecordingTransport,
    remaining_failures: usize,
}

impl FlakyTransport {
    /// Creates a transport that fails the first `failures` publishes.
    #[must_use]
    pub fn new(failures: usize) -> Self {
        Self {
            inner: RecordingTransport::new(),
            remaining_failures: failures,
        }
    }

    /// Returns a handle to this transport's call log.
    #[must_use]
    pub fn log(&self) -> TransportLog {
        self.inner.log()
    }
}

impl Transport for FlakyTransport {
    fn connect(&mut self, config: &PublisherConfig) -> Result<(), TransportError> {
        self.inner.connect(config)
    }

    fn disconnect(&mut self) {
        self.inner.disconnect();
    }

    fn publish(&mut self, channel: &str, payload: &str) -> Result<(), TransportError> {
        if self.remaining_failures > 0 {
            self.remaining_failures -= 1;
            return Err(TransportError::Publish("connection reset by peer".into()));
        }
        self.inner.publish(channel, payload)
    }

    fn status(&self) -> &ConnectionStatus {
        self.inner.status()
    }
}

/// Controls when a [`GatedTransport`]'s `connect` returns.
#[derive(Debug, Clone, Default)]
pub struct Gate(Arc<(Mutex<bool>, Condvar)>);

impl Gate {
    /// Makes subsequent `connect` calls block until [`release`](Self::release).
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn arm(&self) {
        *self.0.0.lock().unwrap() = true;
    }

    /// Unblocks every waiting `connect` and stops blocking new ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn release(&self) {
        *self.0.0.lock().unwrap() = false;
        self.0.1.notify_all();
    }

    fn wait(&self) {
        let (armed, released) = &*self.0;
        let guard = armed.lock().unwrap();
        let _guard = released.wait_while(guard, |armed| *armed).unwrap();
    }
}

/// A transport whose `connect` always fails, and while its [`Gate`] is armed,
/// blocks before failing. Holds the worker in place so a test can fill the
/// queue deterministically.
#[derive(Debug, Default)]
pub struct GatedTransport {
    log: TransportLog,
    status: ConnectionStatus,
    gate: Gate,
}

impl GatedTransport {
    /// Creates a transport with a released gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to this transport's call log.
    #[must_use]
    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }

    /// Returns a handle to this transport's gate.
    #[must_use]
    pub fn gate(&self) -> Gate {
        self.gate.clone()
    }
}

impl Transport for GatedTransport {
    fn connect(&mut self, _config: &PublisherConfig) -> Result<(), TransportError> {
        self.log.record_connect_attempt();
        self.gate.wait();
        Err(TransportError::Connect("connection timed out".into()))
    }

    fn disconnect(&mut self) {
        self.log.record_disconnect();
    }

    fn publish(&mut self, _channel: &str, _payload: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}
