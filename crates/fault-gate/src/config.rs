//! Gate configuration.

use crate::context::RequestContext;
use fault_bus::{ErrorBus, ErrorSink};
use fault_types::{FaultReport, OnFault};
use std::collections::HashSet;
use std::sync::Arc;

/// Eligibility predicate: does this failure participate in central reporting?
pub type HandlesFn = Arc<dyn Fn(&FaultReport, &RequestContext) -> bool + Send + Sync>;

/// Status codes the default predicate treats as expected client errors,
/// not eligible for central reporting.
pub const DEFAULT_REJECTED_STATUS: [u16; 2] = [400, 412];

/// Gate configuration, created once at construction time.
///
/// - Absent `handles` treats every error as eligible.
/// - Absent `on_error` disables reporting entirely: the gate performs no
///   marking and the error passes through untouched.
#[derive(Clone, Default)]
pub struct GateConfig {
    /// Eligibility predicate.
    pub handles: Option<HandlesFn>,

    /// Reporter invoked with eligible failures (typically the error bus).
    pub on_error: Option<OnFault>,
}

impl GateConfig {
    /// Configuration with no predicate and no reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the eligibility predicate.
    #[must_use]
    pub fn with_handles(
        mut self,
        handles: impl Fn(&FaultReport, &RequestContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.handles = Some(Arc::new(handles));
        self
    }

    /// Set the reporter.
    #[must_use]
    pub fn with_on_error(mut self, on_error: impl Fn(&FaultReport) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Production default: report eligible failures to the bus, filtering out
    /// the expected client-error status codes in [`DEFAULT_REJECTED_STATUS`].
    #[must_use]
    pub fn reporting_to(bus: &Arc<ErrorBus>) -> Self {
        let bus = Arc::clone(bus);
        Self {
            handles: Some(status_predicate(DEFAULT_REJECTED_STATUS)),
            on_error: Some(Arc::new(move |report: &FaultReport| {
                bus.publish(report.clone());
            })),
        }
    }
}

/// Build an eligibility predicate from a status-code rejection set.
///
/// A failure whose status code is in the set is not eligible; a failure with
/// no status code always is. The rejection set is a configurable default, not
/// a fixed behavior.
#[must_use]
pub fn status_predicate(rejected: impl IntoIterator<Item = u16>) -> HandlesFn {
    let rejected: HashSet<u16> = rejected.into_iter().collect();
    Arc::new(move |report, _ctx| match report.status() {
        Some(code) => !rejected.contains(&code),
        None => true,
    })
}
