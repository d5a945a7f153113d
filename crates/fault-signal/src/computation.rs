//! On-demand computation form of the safe value wrapper.

use crate::options::{process_defaults, resolve, Resolved, SafeValueDefaults, SafeValueOptions};
use fault_types::FaultReport;
use tracing::debug;

/// Wraps a fallible computation, re-evaluated on every read.
///
/// On success the computed value is returned. On failure, if an effective
/// `on_error` was resolved, the failure is handed to it and the fallback
/// value takes its place; otherwise the failure propagates unchanged.
///
/// An unset fallback substitutes `T::default()`; use `Option<U>` as the
/// value type to make "no value" explicit.
pub struct SafeComputation<T, F> {
    compute: F,
    resolved: Resolved<T>,
}

impl<T, F> SafeComputation<T, F>
where
    T: Clone + Default + 'static,
    F: Fn() -> Result<T, FaultReport>,
{
    /// Wrap a computation, resolving options against the process-wide
    /// defaults.
    #[must_use]
    pub fn new(compute: F, options: SafeValueOptions<T>) -> Self {
        Self {
            resolved: resolve(options, process_defaults()),
            compute,
        }
    }

    /// Wrap a computation against an explicit default layer (primarily for
    /// hosts managing their own configuration lifetime).
    #[must_use]
    pub fn with_defaults(
        compute: F,
        options: SafeValueOptions<T>,
        defaults: &SafeValueDefaults,
    ) -> Self {
        Self {
            resolved: resolve(options, Some(defaults)),
            compute,
        }
    }

    /// Evaluate the computation once.
    ///
    /// # Errors
    ///
    /// Returns the computation's own failure, untouched, when no effective
    /// `on_error` is configured (native propagation).
    pub fn eval(&self) -> Result<T, FaultReport> {
        match (self.compute)() {
            Ok(value) => Ok(value),
            Err(report) => match &self.resolved.on_error {
                Some(on_error) => {
                    on_error.as_ref()(&report);
                    debug!(
                        fault_id = %report.id(),
                        "Computation failure substituted with fallback value"
                    );
                    Ok(self.resolved.fallback.clone().unwrap_or_default())
                }
                None => Err(report),
            },
        }
    }
}
