//! # Fault Types - Shared Error Value and Dedup Marker Protocol
//!
//! Single source of truth for the error value that threads through the
//! Faultline components (gate, trap, bus, safe-value wrapper).
//!
//! The same [`FaultReport`] instance is the unit of identity as it crosses
//! component boundaries: the request gate marks it handled after reporting,
//! and the fallback trap discards marked reports instead of re-publishing
//! them. Clones share the marker, so handing a report to a collaborator never
//! forks its dedup state.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod handled;
pub mod report;

// Re-export main types
pub use handled::Handled;
pub use report::{FaultReport, OnFault};
