//! Pinned event timestamps for tests.

use chrono::{DateTime, Utc};
use fierymud_events_core::clock::Clock;

/// Stamps every event with the same instant, so wire payloads can be
/// compared exactly.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
