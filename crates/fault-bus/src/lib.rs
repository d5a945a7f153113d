//! # Fault Bus - Throttled Broadcast Channel for Error Reports
//!
//! Centralized notification path for failures detected anywhere in the
//! application. Collaborators publish; any component can subscribe to be
//! notified of reported failures (typically a notification component showing
//! a toaster, or a log forwarder).
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Request Gate │                    │   Notifier   │
//! │ Fallback Trap│    publish()       │  (toaster,   │
//! │ Safe Wrapper │ ──────┐            │   logger)    │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Error Bus   │          │
//!                  │  (throttled) │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The bus:
//!
//! - logs every report unconditionally, delivered or not.
//! - applies a leading-edge throttle (configurable, default 2000 ms): a
//!   report published within the window after the last *delivered* report is
//!   suppressed, never queued. This prevents freezing downstream consumers
//!   when a spurious failure fires in a burst.
//! - isolates subscribers from each other: a panicking handler is logged and
//!   never prevents delivery to the remaining subscribers.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod publisher;
pub mod subscriber;
pub mod throttle;

// Re-export main types
pub use config::BusConfig;
pub use publisher::{ErrorBus, ErrorSink, PublishOutcome};
pub use subscriber::{FaultObserver, FaultStream, Subscription, SubscriptionError};
pub use throttle::ThrottleGate;

/// Default throttle window between two deliveries, in milliseconds.
pub const DEFAULT_THROTTLE_MS: u64 = 2000;

/// Maximum reports to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
