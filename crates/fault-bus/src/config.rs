//! Bus configuration.

use std::time::Duration;

use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_THROTTLE_MS};

/// Immutable bus configuration, created once at construction time.
///
/// The single behavioral tunable is the throttle window; a zero window
/// delivers every publish with no suppression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Minimum time between two deliveries to subscribers.
    pub throttle_window: Duration,

    /// Per-subscriber buffer capacity before lagging.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_millis(DEFAULT_THROTTLE_MS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BusConfig {
    /// Configuration with a custom throttle window.
    #[must_use]
    pub fn new(throttle_window: Duration) -> Self {
        Self {
            throttle_window,
            ..Self::default()
        }
    }

    /// Configuration that delivers every publish (no suppression).
    #[must_use]
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Override the per-subscriber buffer capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}
