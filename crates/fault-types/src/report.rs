//! # Fault Report
//!
//! Defines the error value that travels through the coordination core.

use serde::{Deserialize, Serialize};
use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::handled::Handled;

/// Callback invoked with a fault report when a collaborator reports an error.
pub type OnFault = Arc<dyn Fn(&FaultReport) + Send + Sync>;

/// A failure observed somewhere in the application.
///
/// The report is opaque to the bus: any failure can be represented through a
/// message, an optional numeric status code (set by request boundaries), and
/// an optional structured JSON payload.
///
/// Identity and deduplication:
///
/// - Equality is identity-based (`id`), so two reports built from the same
///   message are still distinct failures.
/// - The handled marker lives behind an `Arc`, shared by all clones: marking
///   a clone marks the original. The marker never participates in equality,
///   serialization, or the displayed message.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct FaultReport {
    /// Stable identity of this failure.
    id: Uuid,

    /// Human-readable description of the failure.
    message: String,

    /// Numeric status code, when the failure surfaced at a request boundary.
    status: Option<u16>,

    /// Arbitrary structured payload attached by the reporting site.
    detail: Option<serde_json::Value>,

    /// Dedup marker, shared across clones. Out-of-band: skipped by serde,
    /// ignored by equality. A deserialized report starts unmarked.
    #[serde(skip)]
    handled: Arc<AtomicBool>,
}

impl FaultReport {
    /// Create a report with a fresh identity.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            status: None,
            detail: None,
            handled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach the status code of the failed request.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a structured payload.
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Build a report from any error, preserving its rendered message.
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + '_)) -> Self {
        Self::new(error.to_string())
    }

    /// Build a report from a panic, capturing the payload and location.
    ///
    /// Used by the fallback trap's panic-hook adapter.
    #[must_use]
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());

        let report = Self::new(message);
        match info.location() {
            Some(location) => report.with_detail(serde_json::json!({
                "file": location.file(),
                "line": location.line(),
            })),
            None => report,
        }
    }

    /// Stable identity of this failure.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code of the failed request, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Structured payload, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&serde_json::Value> {
        self.detail.as_ref()
    }
}

impl Handled for FaultReport {
    fn is_handled(&self) -> bool {
        self.handled.load(Ordering::Acquire)
    }

    fn mark_handled(&self) -> bool {
        // swap returns the prior value: marking twice is a no-op.
        !self.handled.swap(true, Ordering::AcqRel)
    }
}

impl PartialEq for FaultReport {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FaultReport {}

impl From<&str> for FaultReport {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for FaultReport {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
