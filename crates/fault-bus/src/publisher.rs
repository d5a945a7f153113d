//! # Error Bus Publisher
//!
//! Defines the publishing side of the error bus.

use crate::config::BusConfig;
use crate::subscriber::{FaultStream, Subscription};
use crate::throttle::ThrottleGate;
use fault_types::FaultReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// Trait for offering fault reports to the bus.
///
/// This is the interface reporting collaborators (gate, trap, safe-value
/// reporters) use; it is synchronous so it can be called from plain callbacks
/// as well as async code.
pub trait ErrorSink: Send + Sync {
    /// Publish a report to the bus.
    fn publish(&self, report: FaultReport) -> PublishOutcome;

    /// Total number of reports offered to the bus, suppressed or not.
    fn reports_published(&self) -> u64;
}

/// What happened to a published report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The report passed the throttle and was fanned out.
    Delivered {
        /// Number of subscribers that received it.
        receivers: usize,
    },

    /// The report fell inside the throttle window and was dropped.
    Suppressed,
}

impl PublishOutcome {
    /// Whether the report reached the fan-out stage.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Centralized error bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics: one delivered report is fanned out to every registered
/// subscriber before `publish` returns. Subscribers that fall behind lag
/// (skip) rather than block the bus.
pub struct ErrorBus {
    /// Broadcast sender for delivered reports.
    sender: broadcast::Sender<FaultReport>,

    /// Leading-edge throttle; single shared timestamp, read-then-written
    /// under the lock within one publish call.
    throttle: Mutex<ThrottleGate>,

    /// Total reports offered, suppressed or not.
    reports_published: AtomicU64,

    /// Reports dropped by the throttle.
    reports_suppressed: AtomicU64,

    /// Construction-time configuration.
    config: BusConfig,
}

impl ErrorBus {
    /// Create a bus with the default configuration (2000 ms window).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Create a bus with a specific configuration.
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            sender,
            throttle: Mutex::new(ThrottleGate::new(config.throttle_window)),
            reports_published: AtomicU64::new(0),
            reports_suppressed: AtomicU64::new(0),
            config,
        }
    }

    /// Subscribe to future delivered reports.
    ///
    /// There is no replay: reports published before the subscription are
    /// never observed by it.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        debug!(
            subscribers = self.sender.receiver_count() + 1,
            "New bus subscription created"
        );
        Subscription::new(self.sender.subscribe())
    }

    /// Get a `Stream` of delivered reports.
    ///
    /// Convenience wrapper over [`ErrorBus::subscribe`].
    #[must_use]
    pub fn fault_stream(&self) -> FaultStream {
        FaultStream::new(self.subscribe())
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Reports dropped by the throttle so far.
    #[must_use]
    pub fn reports_suppressed(&self) -> u64 {
        self.reports_suppressed.load(Ordering::Relaxed)
    }

    /// The construction-time configuration.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }
}

impl Default for ErrorBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink for ErrorBus {
    fn publish(&self, report: FaultReport) -> PublishOutcome {
        // The sink: every report is logged, delivered or not.
        error!(
            fault_id = %report.id(),
            status = ?report.status(),
            "{report}"
        );
        self.reports_published.fetch_add(1, Ordering::Relaxed);

        let admitted = self
            .throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .admit(Instant::now());

        if !admitted {
            self.reports_suppressed.fetch_add(1, Ordering::Relaxed);
            warn!(
                fault_id = %report.id(),
                window = ?self.config.throttle_window,
                "Report suppressed by throttle window"
            );
            return PublishOutcome::Suppressed;
        }

        match self.sender.send(report) {
            Ok(receivers) => {
                debug!(receivers, "Report delivered");
                PublishOutcome::Delivered { receivers }
            }
            Err(broadcast::error::SendError(report)) => {
                // No subscribers - the report was still logged above.
                debug!(fault_id = %report.id(), "Report delivered to no subscribers");
                PublishOutcome::Delivered { receivers: 0 }
            }
        }
    }

    fn reports_published(&self) -> u64 {
        self.reports_published.load(Ordering::Relaxed)
    }
}
