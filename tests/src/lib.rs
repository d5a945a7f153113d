//! # Faultline Test Suite
//!
//! Unified test crate for cross-component flows that no single crate can
//! exercise alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── error_flow.rs      # gate → trap → bus dedup choreography
//!     ├── throttle_flow.rs   # bus throttling under burst, fan-out isolation
//!     └── safe_value_flow.rs # safe wrapper reporting into a live bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fault-tests
//!
//! # By flow
//! cargo test -p fault-tests integration::error_flow
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]
