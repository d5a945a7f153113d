//! # Error Bus Subscriber
//!
//! Defines the subscription side of the error bus.

use async_trait::async_trait;
use fault_types::FaultReport;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The error bus was closed.
    #[error("Error bus closed")]
    Closed,
}

/// Trait for push-style consumers of delivered reports.
///
/// Implement this on a notifier (toaster, log forwarder) and drive it with
/// [`Subscription::dispatch_to`].
#[async_trait]
pub trait FaultObserver: Send + Sync {
    /// Called once per delivered report.
    async fn on_fault(&self, report: FaultReport);
}

/// A subscription handle for receiving delivered reports.
///
/// Owned by the subscriber; dropping it unsubscribes before the next
/// delivery. The bus holds no owning reference back.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<FaultReport>,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(receiver: broadcast::Receiver<FaultReport>) -> Self {
        Self { receiver }
    }

    /// Receive the next delivered report.
    ///
    /// # Returns
    ///
    /// - `Some(report)` - The next delivered report
    /// - `None` - The bus was dropped
    pub async fn recv(&mut self) -> Option<FaultReport> {
        loop {
            match self.receiver.recv().await {
                Ok(report) => return Some(report),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    // No replay guarantee: skipped reports are only logged.
                    debug!(lagged = count, "Subscriber lagged, some reports dropped");
                }
            }
        }
    }

    /// Try to receive the next delivered report without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(report))` - A report was available
    /// - `Ok(None)` - No report available (would block)
    /// - `Err(SubscriptionError::Closed)` - The bus was dropped
    pub fn try_recv(&mut self) -> Result<Option<FaultReport>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(report) => return Ok(Some(report)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }
        }
    }

    /// Drive a callback on its own task, isolating its failures.
    ///
    /// Each delivered report is handed to `handler` inside a panic boundary:
    /// a panicking handler is logged and the loop keeps receiving, so one
    /// faulty subscriber never prevents delivery to the others. Aborting the
    /// returned handle unsubscribes.
    pub fn spawn_handler<F>(mut self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(FaultReport) + Send + 'static,
    {
        tokio::spawn(async move {
            while let Some(report) = self.recv().await {
                let outcome = catch_unwind(AssertUnwindSafe(|| handler(report.clone())));
                if outcome.is_err() {
                    error!(
                        fault_id = %report.id(),
                        "Subscriber handler panicked; report dropped for this subscriber"
                    );
                }
            }
        })
    }

    /// Drive a [`FaultObserver`] until the bus is dropped.
    pub async fn dispatch_to<O: FaultObserver>(mut self, observer: O) {
        while let Some(report) = self.recv().await {
            observer.on_fault(report).await;
        }
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct FaultStream {
    subscription: Subscription,
}

impl FaultStream {
    /// Create a new fault stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }
}

impl Stream for FaultStream {
    type Item = FaultReport;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Use try_recv for non-blocking check
        match self.subscription.try_recv() {
            Ok(Some(report)) => Poll::Ready(Some(report)),
            Ok(None) => {
                // No report ready, need to wait
                // Register waker and return pending
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
