//! # Safe Value Wrapper Against a Live Bus
//!
//! Tests the wrapper's layered configuration with the error bus as the
//! reporting channel, the way an application wires it at startup.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use tokio_stream::wrappers::ReceiverStream;

    use fault_bus::{BusConfig, ErrorBus, ErrorSink};
    use fault_signal::{
        install_defaults, DefaultsError, SafeComputation, SafeStreamValue, SafeValueDefaults,
        SafeValueOptions, StreamState,
    };
    use fault_types::FaultReport;

    use crate::integration::init_test_logging;

    fn bus() -> Arc<ErrorBus> {
        init_test_logging();
        Arc::new(ErrorBus::with_config(BusConfig::unthrottled()))
    }

    #[tokio::test]
    async fn test_computation_failure_reported_to_bus() {
        let bus = bus();
        let mut sub = bus.subscribe();
        let defaults = SafeValueDefaults::reporting_to(&bus);

        let report = FaultReport::new("derivation failed");
        let wrapper = SafeComputation::with_defaults(
            {
                let report = report.clone();
                move || Err::<Option<u32>, _>(report.clone())
            },
            SafeValueOptions::new(),
            &defaults,
        );

        // Handled: the read yields the (absent) fallback instead of failing.
        assert_eq!(wrapper.eval().unwrap(), None);

        assert_eq!(bus.reports_published(), 1);
        assert_eq!(sub.try_recv().unwrap().expect("one delivery"), report);
    }

    #[tokio::test]
    async fn test_explicit_reporter_bypasses_bus_default() {
        let bus = bus();
        let defaults = SafeValueDefaults::reporting_to(&bus);

        let wrapper = SafeComputation::with_defaults(
            || Err::<String, _>(FaultReport::new("local concern")),
            SafeValueOptions::new()
                .with_fallback("fallback".to_string())
                .with_on_error(|_| {
                    // Handled locally; central reporting not wanted here.
                }),
            &defaults,
        );

        assert_eq!(wrapper.eval().unwrap(), "fallback");
        // Explicit per-call options win: nothing reached the bus.
        assert_eq!(bus.reports_published(), 0);
    }

    #[tokio::test]
    async fn test_stream_failure_reported_to_bus() {
        let bus = bus();
        let mut sub = bus.subscribe();
        let defaults =
            SafeValueDefaults::reporting_to(&bus).with_fallback(Vec::<String>::new());

        let (feed, rx) = mpsc::channel(4);
        let mut wrapper = SafeStreamValue::spawn_with_defaults(
            ReceiverStream::new(rx),
            SafeValueOptions::new(),
            &defaults,
        );

        feed.send(Ok(vec!["user-1".to_string()])).await.unwrap();
        let report = FaultReport::new("connection lost");
        feed.send(Err(report.clone())).await.unwrap();

        timeout(Duration::from_secs(1), async {
            while !wrapper.state().is_terminal() {
                assert!(wrapper.changed().await);
            }
        })
        .await
        .expect("terminal state");

        assert_eq!(wrapper.state(), StreamState::FailedHandled(Vec::new()));
        assert_eq!(bus.reports_published(), 1);
        assert_eq!(sub.try_recv().unwrap().expect("one delivery"), report);
    }

    #[tokio::test]
    async fn test_process_wide_defaults_installed_once() {
        let bus = bus();
        let mut sub = bus.subscribe();

        // First install wins; the duplicate is rejected. No other test in
        // this binary touches the process-wide layer.
        install_defaults(SafeValueDefaults::reporting_to(&bus)).expect("first install");
        assert_eq!(
            install_defaults(SafeValueDefaults::new()),
            Err(DefaultsError::AlreadyInstalled)
        );

        let wrapper = SafeComputation::new(
            || Err::<Option<u32>, _>(FaultReport::new("boom")),
            SafeValueOptions::new(),
        );
        assert_eq!(wrapper.eval().unwrap(), None);
        assert_eq!(bus.reports_published(), 1);
        assert!(sub.try_recv().unwrap().is_some());
    }
}
