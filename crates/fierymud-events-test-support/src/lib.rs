//! Shared test doubles and utilities for the FieryMUD event relay.

mod clock;
mod transport;
mod wait;

pub use clock::FixedClock;
pub use transport::{
    FailingTransport, FlakyTransport, Gate, GatedTransport, PublishedMessage, RecordingTransport,
    TransportLog,
};
pub use wait::wait_until;
