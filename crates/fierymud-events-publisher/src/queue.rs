//! Bounded queue between producer threads and the publisher worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, TrySendError, bounded, select};

/// A serialized message waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    /// Destination channel.
    pub channel: String,
    /// Serialized payload.
    pub payload: String,
}

impl QueuedMessage {
    /// Creates a queued message.
    #[must_use]
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Why an enqueue was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The queue was at capacity. The new message is refused; nothing
    /// already queued is evicted.
    QueueFull,
    /// The queue has been closed for shutdown.
    Closed,
}

/// Result of [`EventQueue::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum EnqueueOutcome {
    /// The message is waiting for the worker.
    Enqueued,
    /// The message was refused.
    Dropped(DropReason),
}

/// Capacity-limited FIFO shared by any number of producers and one worker.
///
/// This is the only state producers touch. `enqueue` never waits for space.
#[derive(Debug)]
pub struct EventQueue {
    sender: Sender<QueuedMessage>,
    receiver: Receiver<QueuedMessage>,
    // Dropped by `close` to wake the worker out of `dequeue_timeout`.
    shutdown: Mutex<Option<Sender<()>>>,
    shutdown_signal: Receiver<()>,
    closed: AtomicBool,
    capacity: usize,
}

impl EventQueue {
    /// Creates an empty queue holding at most `capacity` messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        let (shutdown, shutdown_signal) = bounded(0);
        Self {
            sender,
            receiver,
            shutdown: Mutex::new(Some(shutdown)),
            shutdown_signal,
            closed: AtomicBool::new(false),
            capacity,
        }
    }

    /// Appends `message` unless the queue is full or closed, and wakes the
    /// worker.
    pub fn enqueue(&self, message: QueuedMessage) -> EnqueueOutcome {
        if self.is_closed() {
            return EnqueueOutcome::Dropped(DropReason::Closed);
        }

        match self.sender.try_send(message) {
            Ok(()) => EnqueueOutcome::Enqueued,
            Err(TrySendError::Full(_)) => EnqueueOutcome::Dropped(DropReason::QueueFull),
            Err(TrySendError::Disconnected(_)) => EnqueueOutcome::Dropped(DropReason::Closed),
        }
    }

    /// Waits up to `timeout` for a message and removes the oldest one.
    ///
    /// Returns `None` on timeout, and immediately once the queue is closed.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<QueuedMessage> {
        if self.is_closed() {
            return None;
        }

        select! {
            recv(self.receiver) -> message => message.ok().filter(|_| !self.is_closed()),
            recv(self.shutdown_signal) -> _ => None,
            default(timeout) => None,
        }
    }

    /// Closes the queue, wakes every waiter and discards whatever is still
    /// queued. Returns how many messages were discarded.
    pub fn close(&self) -> usize {
        self.closed.store(true, Ordering::Release);
        drop(
            self.shutdown
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );

        self.receiver.try_iter().count()
    }

    /// Returns whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Returns the maximum number of queued messages.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
