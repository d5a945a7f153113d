//! Layered option resolution for safe value wrappers.

use fault_bus::{ErrorBus, ErrorSink};
use fault_types::{FaultReport, OnFault};
use std::any::Any;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Errors from installing the process-wide defaults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefaultsError {
    /// Defaults were already installed earlier in the process lifetime.
    #[error("process-wide safe value defaults already installed")]
    AlreadyInstalled,
}

/// Per-call wrapper options.
///
/// Both fields are optional; an absent field falls through to the
/// process-wide defaults, and from there to native propagation.
#[derive(Clone)]
pub struct SafeValueOptions<T> {
    /// Value substituted for a handled failure.
    pub fallback: Option<T>,

    /// Callback invoked with the failure when it is handled.
    pub on_error: Option<OnFault>,
}

impl<T> Default for SafeValueOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SafeValueOptions<T> {
    /// Options with no fallback and no reporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback: None,
            on_error: None,
        }
    }

    /// Set the fallback value.
    #[must_use]
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Set the error callback.
    #[must_use]
    pub fn with_on_error(mut self, on_error: impl Fn(&FaultReport) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(on_error));
        self
    }
}

/// Process-wide default layer, constructed once at application start.
///
/// The default fallback is type-erased (wrappers are instantiated for many
/// value types); it is recovered per call with [`SafeValueDefaults::fallback_for`],
/// and a stored value of a different type counts as absent.
#[derive(Clone, Default)]
pub struct SafeValueDefaults {
    fallback: Option<Arc<dyn Any + Send + Sync>>,
    on_error: Option<OnFault>,
}

impl SafeValueDefaults {
    /// Empty defaults (equivalent to no defaults being installed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default fallback value.
    #[must_use]
    pub fn with_fallback<T: Clone + Send + Sync + 'static>(mut self, fallback: T) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Set the default error callback.
    #[must_use]
    pub fn with_on_error(mut self, on_error: impl Fn(&FaultReport) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(on_error));
        self
    }

    /// Production default: report handled failures to the bus, no fallback.
    #[must_use]
    pub fn reporting_to(bus: &Arc<ErrorBus>) -> Self {
        let bus = Arc::clone(bus);
        Self::new().with_on_error(move |report: &FaultReport| {
            bus.publish(report.clone());
        })
    }

    /// Recover the default fallback for a concrete value type.
    #[must_use]
    pub fn fallback_for<T: Clone + 'static>(&self) -> Option<T> {
        self.fallback
            .as_ref()
            .and_then(|any| any.downcast_ref::<T>())
            .cloned()
    }

    /// The default error callback, if any.
    #[must_use]
    pub fn on_error(&self) -> Option<&OnFault> {
        self.on_error.as_ref()
    }
}

static DEFAULTS: OnceLock<SafeValueDefaults> = OnceLock::new();

/// Install the process-wide defaults. Call once at application start.
///
/// # Errors
///
/// `DefaultsError::AlreadyInstalled` if defaults were installed before.
pub fn install_defaults(defaults: SafeValueDefaults) -> Result<(), DefaultsError> {
    DEFAULTS
        .set(defaults)
        .map_err(|_| DefaultsError::AlreadyInstalled)
}

/// The installed process-wide defaults, if any.
#[must_use]
pub fn process_defaults() -> Option<&'static SafeValueDefaults> {
    DEFAULTS.get()
}

/// Effective options after merging the layers.
#[derive(Clone)]
pub(crate) struct Resolved<T> {
    pub fallback: Option<T>,
    pub on_error: Option<OnFault>,
}

/// Merge explicit options over defaults; first non-absent layer wins per
/// field. Plain parameter merging, no ambient lookup.
pub(crate) fn resolve<T: Clone + 'static>(
    explicit: SafeValueOptions<T>,
    defaults: Option<&SafeValueDefaults>,
) -> Resolved<T> {
    Resolved {
        fallback: explicit
            .fallback
            .or_else(|| defaults.and_then(SafeValueDefaults::fallback_for::<T>)),
        on_error: explicit
            .on_error
            .or_else(|| defaults.and_then(|d| d.on_error().cloned())),
    }
}
