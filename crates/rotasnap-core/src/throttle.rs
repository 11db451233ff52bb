//! Leading-edge rate limiting for pointer moves.

use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

/// Lets the first event through, then drops everything until `interval`
/// has elapsed since the last accepted one. Dropped events are not queued.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given window.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Returns `true` if an event arriving at `now` should be handled,
    /// and records it as the last accepted event.
    pub fn ready(&mut self, now: Instant) -> bool {
        let open = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if open {
            self.last_fired = Some(now);
        }
        open
    }

    /// When the last event was accepted.
    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }
}
