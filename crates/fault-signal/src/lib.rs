//! # Fault Signal - Safe Value Wrapper
//!
//! Converts a fallible value-producing source (an on-demand computation or a
//! push-based stream that may terminate in failure) into a never-failing
//! value, with error reporting as a side effect.
//!
//! Without this wrapper, a failure inside a derived value surfaces on every
//! read of that value, so the same error can be raised repeatedly while the
//! rest of the application keeps rendering. Wrapped, the failure is reported
//! once through a pluggable callback and a substitute value takes its place.
//!
//! Option resolution is layered, first non-absent wins per field:
//!
//! 1. explicit per-call [`SafeValueOptions`]
//! 2. process-wide [`SafeValueDefaults`]
//! 3. no handling: the failure propagates natively
//!
//! The wrapper reaches the error bus only through the pluggable `on_error`
//! reporter; see [`SafeValueDefaults::reporting_to`].

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod computation;
pub mod options;
pub mod stream;

// Re-export main types
pub use computation::SafeComputation;
pub use options::{install_defaults, process_defaults, DefaultsError, SafeValueDefaults, SafeValueOptions};
pub use stream::{SafeStreamValue, StreamState};
