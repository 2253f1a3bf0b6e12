//! Publisher statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Why a message was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCause {
    /// Refused at enqueue because the queue was full.
    QueueFull,
    /// Dequeued while disconnected and the reconnect failed.
    ConnectFailed,
    /// The broker failed to accept the publish.
    PublishFailed,
}

/// Point-in-time snapshot of publisher health.
///
/// Counters never decrease. They are read independently, so a snapshot taken
/// while the worker is active may be off by one between fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublisherStats {
    /// Messages the broker accepted.
    pub events_published: u64,
    /// Messages lost for any reason; the sum of the three `dropped_*` fields.
    pub events_dropped: u64,
    /// Messages refused because the queue was full.
    pub dropped_queue_full: u64,
    /// Messages discarded because the worker could not connect.
    pub dropped_connect_failed: u64,
    /// Messages discarded because the publish itself failed.
    pub dropped_publish_failed: u64,
    /// Times the worker tried to (re)connect.
    pub reconnect_attempts: u64,
    /// Messages waiting in the queue.
    pub queue_depth: usize,
    /// Whether the worker currently holds a broker connection.
    pub connected: bool,
}

/// Atomic counters updated by producers and the worker.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    published: AtomicU64,
    dropped_queue_full: AtomicU64,
    dropped_connect_failed: AtomicU64,
    dropped_publish_failed: AtomicU64,
    reconnect_attempts: AtomicU64,
}

impl Counters {
    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drop(&self, cause: DropCause) {
        let counter = match cause {
            DropCause::QueueFull => &self.dropped_queue_full,
            DropCause::ConnectFailed => &self.dropped_connect_failed,
            DropCause::PublishFailed => &self.dropped_publish_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reconnect_attempt(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, queue_depth: usize, connected: bool) -> PublisherStats {
        let dropped_queue_full = self.dropped_queue_full.load(Ordering::Relaxed);
        let dropped_connect_failed = self.dropped_connect_failed.load(Ordering::Relaxed);
        let dropped_publish_failed = self.dropped_publish_failed.load(Ordering::Relaxed);

        PublisherStats {
            events_published: self.published.load(Ordering::Relaxed),
            events_dropped: dropped_queue_full + dropped_connect_failed + dropped_publish_failed,
            dropped_queue_full,
            dropped_connect_failed,
            dropped_publish_failed,
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
            queue_depth,
            connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_total_is_sum_of_causes() {
        // Arrange
        let counters = Counters::default();
        counters.record_drop(DropCause::QueueFull);
        counters.record_drop(DropCause::QueueFull);
        counters.record_drop(DropCause::ConnectFailed);
        counters.record_drop(DropCause::PublishFailed);
        counters.record_published();
        counters.record_reconnect_attempt();

        // Act
        let stats = counters.snapshot(3, true);

        // Assert
        assert_eq!(stats.events_dropped, 4);
        assert_eq!(stats.dropped_queue_full, 2);
        assert_eq!(stats.dropped_connect_failed, 1);
        assert_eq!(stats.dropped_publish_failed, 1);
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.reconnect_attempts, 1);
        assert_eq!(stats.queue_depth, 3);
        assert!(stats.connected);
    }

    #[test]
    fn test_fresh_counters_snapshot_to_zero() {
        assert_eq!(Counters::default().snapshot(0, false), PublisherStats::default());
    }
}
