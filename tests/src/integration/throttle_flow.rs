//! # Bus Throttling Under Burst
//!
//! Tests the leading-edge throttle against subscriber fan-out: rapid-fire
//! failures must not overwhelm downstream consumers, and a misbehaving
//! subscriber must not starve the others.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{advance, timeout};

    use fault_bus::{BusConfig, ErrorBus, ErrorSink, PublishOutcome};
    use fault_types::FaultReport;

    use crate::integration::init_test_logging;

    fn drain(sub: &mut fault_bus::Subscription) -> Vec<String> {
        let mut messages = Vec::new();
        while let Ok(Some(report)) = sub.try_recv() {
            messages.push(report.message().to_string());
        }
        messages
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_leading_edge() {
        init_test_logging();
        let bus = ErrorBus::with_config(BusConfig::new(Duration::from_millis(2000)));
        let mut sub = bus.subscribe();

        // A spurious failure firing every 100ms for one second.
        for i in 0..10 {
            if i > 0 {
                advance(Duration::from_millis(100)).await;
            }
            bus.publish(FaultReport::new(format!("spurious-{i}")));
        }

        assert_eq!(drain(&mut sub), ["spurious-0"]);
        assert_eq!(bus.reports_published(), 10);
        assert_eq!(bus.reports_suppressed(), 9);

        // Past the window the next failure is delivered immediately.
        advance(Duration::from_millis(2000)).await;
        bus.publish(FaultReport::new("after-window"));
        assert_eq!(drain(&mut sub), ["after-window"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_is_global_not_per_report() {
        init_test_logging();
        let bus = ErrorBus::with_config(BusConfig::new(Duration::from_millis(2000)));
        let mut sub = bus.subscribe();

        // Two distinct failures inside one window still collapse.
        assert!(bus.publish(FaultReport::new("first kind")).is_delivered());
        advance(Duration::from_millis(10)).await;
        assert_eq!(
            bus.publish(FaultReport::new("second kind")),
            PublishOutcome::Suppressed
        );

        assert_eq!(drain(&mut sub), ["first kind"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_subscribers_see_each_delivered_report() {
        init_test_logging();
        let bus = ErrorBus::with_config(BusConfig::new(Duration::from_millis(2)));
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        advance(Duration::from_millis(1)).await;
        let outcome = bus.publish(FaultReport::new("a"));
        assert_eq!(outcome, PublishOutcome::Delivered { receivers: 2 });

        advance(Duration::from_millis(2)).await;
        bus.publish(FaultReport::new("b")); // suppressed
        advance(Duration::from_millis(1)).await;
        bus.publish(FaultReport::new("c"));

        assert_eq!(drain(&mut first), ["a", "c"]);
        assert_eq!(drain(&mut second), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_does_not_starve_others_under_burst() {
        init_test_logging();
        let bus = ErrorBus::with_config(BusConfig::unthrottled());

        let poisoned = bus.subscribe().spawn_handler(|_| panic!("notifier bug"));

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let healthy = bus.subscribe().spawn_handler(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        for i in 0..5 {
            bus.publish(FaultReport::new(format!("burst-{i}")));
        }

        timeout(Duration::from_secs(1), async {
            while seen.load(Ordering::SeqCst) < 5 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("healthy subscriber should receive the full burst");

        poisoned.abort();
        healthy.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribed_observer_receives_nothing_further() {
        init_test_logging();
        let bus = ErrorBus::with_config(BusConfig::unthrottled());

        let mut first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(FaultReport::new("before"));
        drop(second);
        bus.publish(FaultReport::new("after"));

        // The remaining subscriber still gets both; the dropped one is gone
        // before the next delivery.
        assert_eq!(drain(&mut first), ["before", "after"]);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
