//! Asynchronous outbound publisher for FieryMUD game events.
//!
//! Producer threads hand events to an [`EventPublisher`], which queues them
//! on a bounded [`EventQueue`] and returns immediately. A single background
//! worker drains the queue and owns the broker [`Transport`], reconnecting
//! as needed. Delivery is at-most-once; every loss is counted in
//! [`PublisherStats`].
//!
//! [`Transport`]: fierymud_events_core::transport::Transport

pub mod error;
pub mod publisher;
pub mod queue;
pub mod stats;
mod worker;

pub use error::PublisherError;
pub use publisher::EventPublisher;
pub use queue::{DropReason, EnqueueOutcome, EventQueue, QueuedMessage};
pub use stats::{DropCause, PublisherStats};
