//! The request gate itself.

use crate::config::GateConfig;
use crate::context::RequestContext;
use fault_bus::ErrorBus;
use fault_types::{FaultReport, Handled};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Wraps outbound request execution; on failure, reports eligible errors,
/// marks them handled, and re-raises unconditionally.
pub struct RequestGate {
    config: GateConfig,
}

impl RequestGate {
    /// Create a gate with an explicit configuration.
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Create a gate with the production default configuration reporting to
    /// the given bus.
    #[must_use]
    pub fn with_bus(bus: &Arc<ErrorBus>) -> Self {
        Self::new(GateConfig::reporting_to(bus))
    }

    /// Execute an outbound request.
    ///
    /// The caller always observes the original outcome: a success is returned
    /// untouched, and a failure is re-raised as the identical report, at most
    /// now carrying the handled marker.
    pub async fn execute<T, Fut>(
        &self,
        ctx: &RequestContext,
        request: Fut,
    ) -> Result<T, FaultReport>
    where
        Fut: Future<Output = Result<T, FaultReport>>,
    {
        match request.await {
            Ok(value) => Ok(value),
            Err(report) => Err(self.intercept(ctx, report)),
        }
    }

    /// Execute a synchronous request. Same contract as [`RequestGate::execute`].
    pub fn execute_sync<T>(
        &self,
        ctx: &RequestContext,
        request: impl FnOnce() -> Result<T, FaultReport>,
    ) -> Result<T, FaultReport> {
        match request() {
            Ok(value) => Ok(value),
            Err(report) => Err(self.intercept(ctx, report)),
        }
    }

    /// Report an eligible failure and mark it handled. Always returns the
    /// same report for re-raising.
    fn intercept(&self, ctx: &RequestContext, report: FaultReport) -> FaultReport {
        let Some(on_error) = &self.config.on_error else {
            // No reporter configured: the error passes through untouched.
            return report;
        };

        if report.is_handled() {
            debug!(
                fault_id = %report.id(),
                correlation_id = %ctx.correlation_id,
                "Failure already handled upstream; re-raising without reporting"
            );
            return report;
        }

        let eligible = match &self.config.handles {
            Some(handles) => handles.as_ref()(&report, ctx),
            None => true,
        };

        if !eligible {
            debug!(
                fault_id = %report.id(),
                status = ?report.status(),
                correlation_id = %ctx.correlation_id,
                "Failure not eligible for central reporting: {ctx}"
            );
            return report;
        }

        // A faulting reporter is a defect to surface separately; it must
        // never mask the original failure's propagation.
        match catch_unwind(AssertUnwindSafe(|| on_error.as_ref()(&report))) {
            Ok(()) => {
                report.mark_handled();
            }
            Err(_) => {
                error!(
                    fault_id = %report.id(),
                    correlation_id = %ctx.correlation_id,
                    "Reporter panicked while handling request failure"
                );
            }
        }

        report
    }
}
