//! The background worker that owns broker delivery.

use std::sync::Arc;

use fierymud_events_core::config::PublisherConfig;
use fierymud_events_core::transport::Transport;
use tracing::{debug, error};

use crate::queue::{EventQueue, QueuedMessage};
use crate::stats::{Counters, DropCause};

/// What happened to one dequeued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Published,
    ConnectFailed,
    PublishFailed,
}

/// Drains the queue into the transport until the queue is closed.
///
/// The worker is the only user of the transport, so connect, publish and
/// disconnect need no locking. Messages that cannot be delivered are counted
/// and discarded, never retried.
pub(crate) struct Worker<T: Transport> {
    transport: T,
    queue: Arc<EventQueue>,
    counters: Arc<Counters>,
    config: PublisherConfig,
}

impl<T: Transport> Worker<T> {
    pub(crate) fn new(
        transport: T,
        queue: Arc<EventQueue>,
        counters: Arc<Counters>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            transport,
            queue,
            counters,
            config,
        }
    }

    /// Runs until the queue is closed, then hands the transport back so the
    /// caller can disconnect it.
    pub(crate) fn run(mut self) -> T {
        debug!("event publisher worker started");

        while !self.queue.is_closed() {
            if let Some(message) = self.queue.dequeue_timeout(self.config.poll_interval) {
                self.deliver(&message);
            }
        }

        debug!("event publisher worker stopped");
        self.transport
    }

    pub(crate) fn deliver(&mut self, message: &QueuedMessage) -> Delivery {
        if !self.transport.is_connected() {
            self.counters.record_reconnect_attempt();
            if let Err(e) = self.transport.connect(&self.config) {
                error!(
                    host = %self.config.host,
                    port = self.config.port,
                    error = %e,
                    "event broker connection failed; dropping event"
                );
                self.counters.record_drop(DropCause::ConnectFailed);
                return Delivery::ConnectFailed;
            }
        }

        match self.transport.publish(&message.channel, &message.payload) {
            Ok(()) => {
                self.counters.record_published();
                Delivery::Published
            }
            Err(e) => {
                error!(channel = %message.channel, error = %e, "event publish failed");
                self.counters.record_drop(DropCause::PublishFailed);
                // Force a fresh connect on the next message.
                self.transport.disconnect();
                Delivery::PublishFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use fierymud_events_test_support::{FailingTransport, FlakyTransport, RecordingTransport};

    use super::*;

    fn config() -> PublisherConfig {
        PublisherConfig {
            poll_interval: Duration::from_millis(10),
            ..PublisherConfig::default()
        }
    }

    fn worker<T: Transport>(transport: T) -> (Worker<T>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let worker = Worker::new(
            transport,
            Arc::new(EventQueue::new(16)),
            Arc::clone(&counters),
            config(),
        );
        (worker, counters)
    }

    fn message() -> QueuedMessage {
        QueuedMessage::new("fierymud:events:admin", "{\"type\":\"ADMIN_WARNING\"}")
    }

    #[test]
    fn test_deliver_connects_lazily_then_publishes() {
        // Arrange
        let transport = RecordingTransport::new();
        let log = transport.log();
        let (mut worker, counters) = worker(transport);

        // Act
        let first = worker.deliver(&message());
        let second = worker.deliver(&message());

        // Assert
        assert_eq!(first, Delivery::Published);
        assert_eq!(second, Delivery::Published);
        assert_eq!(log.connects(), 1);
        assert_eq!(log.published().len(), 2);
        let stats = counters.snapshot(0, true);
        assert_eq!(stats.events_published, 2);
        assert_eq!(stats.reconnect_attempts, 1);
        assert_eq!(stats.events_dropped, 0);
    }

    #[test]
    fn test_deliver_drops_message_when_connect_fails() {
        // Arrange
        let transport = FailingTransport::new();
        let log = transport.log();
        let (mut worker, counters) = worker(transport);

        // Act
        let outcome = worker.deliver(&message());

        // Assert
        assert_eq!(outcome, Delivery::ConnectFailed);
        assert_eq!(log.connect_attempts(), 1);
        let stats = counters.snapshot(0, false);
        assert_eq!(stats.dropped_connect_failed, 1);
        assert_eq!(stats.reconnect_attempts, 1);
        assert_eq!(stats.events_published, 0);
    }

    #[test]
    fn test_connect_is_retried_on_every_message() {
        // Arrange
        let transport = FailingTransport::new();
        let log = transport.log();
        let (mut worker, counters) = worker(transport);

        // Act
        for _ in 0..3 {
            let _ = worker.deliver(&message());
        }

        // Assert
        assert_eq!(log.connect_attempts(), 3);
        assert_eq!(counters.snapshot(0, false).reconnect_attempts, 3);
    }

    #[test]
    fn test_publish_failure_disconnects_and_next_message_reconnects() {
        // Arrange
        let transport = FlakyTransport::new(1);
        let log = transport.log();
        let (mut worker, counters) = worker(transport);

        // Act
        let failed = worker.deliver(&message());
        let recovered = worker.deliver(&message());

        // Assert
        assert_eq!(failed, Delivery::PublishFailed);
        assert_eq!(recovered, Delivery::Published);
        assert_eq!(log.connects(), 2);
        assert_eq!(log.disconnects(), 1);
        let stats = counters.snapshot(0, true);
        assert_eq!(stats.dropped_publish_failed, 1);
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.reconnect_attempts, 2);
    }

    #[test]
    fn test_run_drains_in_fifo_order_and_returns_transport_on_close() {
        // Arrange
        let transport = RecordingTransport::new();
        let log = transport.log();
        let queue = Arc::new(EventQueue::new(16));
        let counters = Arc::new(Counters::default());
        for n in 0..3 {
            let _ = queue.enqueue(QueuedMessage::new("c", n.to_string()));
        }
        let worker = Worker::new(transport, Arc::clone(&queue), Arc::clone(&counters), config());

        // Act
        let handle = thread::spawn(move || worker.run());
        let drained = fierymud_events_test_support::wait_until(Duration::from_secs(2), || {
            log.published().len() == 3
        });
        let _ = queue.close();
        let transport = handle.join().unwrap();

        // Assert
        assert!(drained);
        let payloads: Vec<String> = log.published().into_iter().map(|m| m.payload).collect();
        assert_eq!(payloads, vec!["0", "1", "2"]);
        assert!(transport.is_connected());
    }
}
