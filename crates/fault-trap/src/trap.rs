//! The fallback trap itself.

use fault_bus::{ErrorBus, ErrorSink};
use fault_types::{FaultReport, Handled};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Last-resort handler publishing unmarked failures to the error bus.
pub struct FallbackTrap {
    bus: Arc<ErrorBus>,
}

impl FallbackTrap {
    /// Create a trap forwarding to the given bus.
    #[must_use]
    pub fn new(bus: Arc<ErrorBus>) -> Self {
        Self { bus }
    }

    /// Process an uncaught failure.
    ///
    /// A report already marked handled was reported at the boundary where it
    /// was first observed and is discarded here. Anything else is published.
    /// This method never panics.
    pub fn handle(&self, report: FaultReport) {
        if report.is_handled() {
            debug!(
                fault_id = %report.id(),
                "Failure already handled upstream; discarding"
            );
            return;
        }

        // Nothing sits above the trap: a faulting sink ends here, logged.
        let outcome = catch_unwind(AssertUnwindSafe(|| self.bus.publish(report.clone())));
        if outcome.is_err() {
            error!(
                fault_id = %report.id(),
                "Error bus faulted inside the fallback trap"
            );
        }
    }

    /// The bus this trap forwards to.
    #[must_use]
    pub fn bus(&self) -> &Arc<ErrorBus> {
        &self.bus
    }
}
