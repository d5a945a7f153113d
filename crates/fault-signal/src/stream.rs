//! Stream form of the safe value wrapper.

use crate::options::{process_defaults, resolve, Resolved, SafeValueDefaults, SafeValueOptions};
use fault_types::FaultReport;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Observable state of a wrapped stream.
///
/// Transitions: `Pending` → `Active` (each value replaces the prior) →
/// terminal `FailedHandled` or `FailedPropagated`. No transition leaves a
/// terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamState<T> {
    /// Subscribed, nothing emitted yet.
    Pending,

    /// Live; holds the latest emitted value.
    Active(T),

    /// The stream failed and the failure was reported; holds the fallback.
    FailedHandled(T),

    /// The stream failed with no effective `on_error`; the failure surfaces
    /// here, the caller's own failure channel.
    FailedPropagated(FaultReport),
}

impl<T> StreamState<T> {
    /// Whether the stream reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FailedHandled(_) | Self::FailedPropagated(_))
    }

    /// The current value, if the state carries one.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Active(value) | Self::FailedHandled(value) => Some(value),
            Self::Pending | Self::FailedPropagated(_) => None,
        }
    }

    /// The propagated failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FaultReport> {
        match self {
            Self::FailedPropagated(report) => Some(report),
            _ => None,
        }
    }
}

/// Wraps a failable stream into a never-failing observable value.
///
/// The stream is subscribed exactly once and driven on its own task; each
/// emitted value becomes the wrapper's current value. A terminal failure
/// either becomes the fallback value (reported through `on_error`) or is
/// surfaced as [`StreamState::FailedPropagated`]. Dropping the wrapper stops
/// the driving task.
pub struct SafeStreamValue<T> {
    state: watch::Receiver<StreamState<T>>,
    driver: JoinHandle<()>,
}

impl<T> SafeStreamValue<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// Wrap a stream, resolving options against the process-wide defaults.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn<S>(stream: S, options: SafeValueOptions<T>) -> Self
    where
        S: Stream<Item = Result<T, FaultReport>> + Send + 'static,
    {
        Self::spawn_resolved(stream, resolve(options, process_defaults()))
    }

    /// Wrap a stream against an explicit default layer.
    #[must_use]
    pub fn spawn_with_defaults<S>(
        stream: S,
        options: SafeValueOptions<T>,
        defaults: &SafeValueDefaults,
    ) -> Self
    where
        S: Stream<Item = Result<T, FaultReport>> + Send + 'static,
    {
        Self::spawn_resolved(stream, resolve(options, Some(defaults)))
    }

    fn spawn_resolved<S>(stream: S, resolved: Resolved<T>) -> Self
    where
        S: Stream<Item = Result<T, FaultReport>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(StreamState::Pending);

        let driver = tokio::spawn(async move {
            tokio::pin!(stream);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(value) => {
                        if tx.send(StreamState::Active(value)).is_err() {
                            // Wrapper dropped; stop consuming.
                            return;
                        }
                    }
                    Err(report) => {
                        let terminal = match &resolved.on_error {
                            Some(on_error) => {
                                on_error.as_ref()(&report);
                                warn!(
                                    fault_id = %report.id(),
                                    "Stream failure substituted with fallback value"
                                );
                                StreamState::FailedHandled(
                                    resolved.fallback.clone().unwrap_or_default(),
                                )
                            }
                            None => {
                                debug!(
                                    fault_id = %report.id(),
                                    "Stream failure propagated to the caller"
                                );
                                StreamState::FailedPropagated(report)
                            }
                        };
                        let _ = tx.send(terminal);
                        // Terminal: no further emissions are consumed.
                        return;
                    }
                }
            }
        });

        Self { state: rx, driver }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> StreamState<T> {
        self.state.borrow().clone()
    }

    /// The current value (`Active` or `FailedHandled`).
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.state.borrow().value().cloned()
    }

    /// The propagated failure, if the stream terminated unhandled.
    #[must_use]
    pub fn error(&self) -> Option<FaultReport> {
        self.state.borrow().error().cloned()
    }

    /// Wait for the next state change.
    ///
    /// Returns `false` once no further changes can occur (the driving task
    /// finished and the last state was observed).
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }
}

impl<T> Drop for SafeStreamValue<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
