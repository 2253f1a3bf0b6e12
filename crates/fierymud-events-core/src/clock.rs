//! Time source for event timestamps.
//!
//! Events carry the moment they were raised, serialized as epoch
//! milliseconds. Producers stamp through a [`Clock`] so tests can pin it.

use chrono::{DateTime, Utc};

/// Supplies the instant a game event is stamped with.
pub trait Clock: Send + Sync {
    /// Returns the instant to stamp the next event with.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by the running game.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_stamps_current_epoch_millis() {
        let before = Utc::now().timestamp_millis();

        let stamped = SystemClock.now().timestamp_millis();

        assert!(stamped >= before);
        assert!(stamped - before < 1_000);
    }
}
