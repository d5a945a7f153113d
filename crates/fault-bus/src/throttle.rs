//! # Throttle Gate
//!
//! Leading-edge rate limiter for bus deliveries.
//!
//! The gate holds only the timestamp of the last delivered report: the first
//! publish after construction (or after the window has elapsed since the last
//! delivery) passes immediately and restarts the window; a publish inside the
//! window is suppressed, never queued or delayed. Throttling is global across
//! the bus, not per distinct report.

use std::time::Duration;
use tokio::time::Instant;

/// Leading-edge admission filter over a single shared timestamp.
#[derive(Debug)]
pub struct ThrottleGate {
    /// Minimum time between two admitted events.
    window: Duration,

    /// Timestamp of the last admitted event.
    last_delivered: Option<Instant>,
}

impl ThrottleGate {
    /// Create a gate with the given window. A zero window admits everything.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_delivered: None,
        }
    }

    /// Decide whether an event occurring at `now` may be delivered.
    ///
    /// Admission records `now` as the new window origin. An event at exactly
    /// the window boundary is still suppressed; the window re-opens strictly
    /// after it elapses.
    pub fn admit(&mut self, now: Instant) -> bool {
        if self.window.is_zero() {
            return true;
        }

        if let Some(last) = self.last_delivered {
            if now.saturating_duration_since(last) <= self.window {
                return false;
            }
        }

        self.last_delivered = Some(now);
        true
    }

    /// The configured window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}
