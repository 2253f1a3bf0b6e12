//! Polling helper for assertions on background work.

use std::thread;
use std::time::{Duration, Instant};

/// Polls `condition` until it holds or `timeout` elapses. Returns whether it
/// held.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}
