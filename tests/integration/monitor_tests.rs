//! Monitor behaviour observed through the public API

#[cfg(test)]
mod tests {
    use crate::common::provider;
    use parking_lot::Mutex;
    use quota_sentinel::config::{ProviderLimitConfig, WindowConfig};
    use quota_sentinel::core::rate_limiter::status_callback;
    use quota_sentinel::{Classification, RateLimitMonitor, SentinelError, StatusChange};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn recorded(monitor: &RateLimitMonitor) -> Arc<Mutex<Vec<StatusChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        monitor.register_status_callback(status_callback(move |change| {
            sink.lock().push(change.clone());
            Ok(())
        }));
        changes
    }

    #[test]
    fn test_providers_are_tracked_independently() {
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 4), provider("gemini", 100)]);
        let changes = recorded(&monitor);
        let now = Instant::now();

        for _ in 0..4 {
            monitor.register_call_at("claude", now);
            monitor.register_call_at("gemini", now);
        }

        assert_eq!(
            monitor.get_status_at("claude", now).classification,
            Classification::Throttled
        );
        let gemini = monitor.get_status_at("gemini", now);
        assert_eq!(gemini.classification, Classification::Normal);
        assert_eq!(gemini.usage_ratio, 0.04);

        assert!(changes.lock().iter().all(|c| c.provider == "claude"));
    }

    #[test]
    fn test_daily_window_outlives_minute_window() {
        let config = ProviderLimitConfig {
            name: "claude".to_string(),
            rpm: Some(10),
            rpd: Some(20),
            ..Default::default()
        };
        let monitor = RateLimitMonitor::from_configs(&[config]);
        let start = Instant::now();

        for _ in 0..18 {
            monitor.register_call_at("claude", start);
        }
        let status = monitor.get_status_at("claude", start);
        assert_eq!(status.classification, Classification::Throttled);

        // The minute window has drained, the daily one still counts 18 of 20
        let later = start + Duration::from_secs(120);
        let status = monitor.get_status_at("claude", later);
        assert_eq!(status.usage_ratio, 0.9);
        assert_eq!(status.classification, Classification::Warning);
        assert_eq!(status.windows.len(), 2);
    }

    #[test]
    fn test_custom_thresholds_and_windows() {
        let config = ProviderLimitConfig {
            name: "local".to_string(),
            windows: vec![WindowConfig {
                seconds: 10,
                limit: 10,
            }],
            warning_threshold: 0.5,
            throttled_threshold: 0.8,
            ..Default::default()
        };
        let monitor = RateLimitMonitor::from_configs(&[config]);
        let now = Instant::now();

        for _ in 0..5 {
            monitor.register_call_at("local", now);
        }
        assert_eq!(
            monitor.get_status_at("local", now).classification,
            Classification::Warning
        );

        for _ in 0..3 {
            monitor.register_call_at("local", now);
        }
        assert_eq!(
            monitor.get_status_at("local", now).classification,
            Classification::Throttled
        );

        let recovered = monitor.get_status_at("local", now + Duration::from_secs(11));
        assert_eq!(recovered.classification, Classification::Normal);
        assert_eq!(recovered.usage_ratio, 0.0);
    }

    #[test]
    fn test_failing_listener_does_not_block_others() {
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 4)]);
        monitor.register_status_callback(status_callback(|change| {
            Err(SentinelError::listener(
                change.provider.clone(),
                change.old,
                change.new,
                "sink offline",
            ))
        }));
        monitor.register_status_callback(status_callback(|_| panic!("listener bug")));
        let changes = recorded(&monitor);

        for _ in 0..2 {
            monitor.register_call("claude");
        }
        let status = monitor.register_call("claude");
        assert_eq!(status.classification, Classification::Warning);
        let status = monitor.register_call("claude");
        assert_eq!(status.classification, Classification::Throttled);

        let news: Vec<_> = changes.lock().iter().map(|c| c.new).collect();
        assert_eq!(news, vec![Classification::Warning, Classification::Throttled]);
    }

    #[test]
    fn test_concurrent_calls_across_providers() {
        let monitor = Arc::new(RateLimitMonitor::from_configs(&[
            provider("claude", 10_000),
            provider("gemini", 10_000),
        ]));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let monitor = Arc::clone(&monitor);
                let name = if i % 2 == 0 { "claude" } else { "gemini" };
                thread::spawn(move || {
                    for _ in 0..500 {
                        monitor.register_call(name);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let statuses = monitor.sweep();
        assert_eq!(statuses.len(), 2);
        for status in statuses {
            assert_eq!(status.windows[0].count, 2000);
            assert_eq!(status.usage_ratio, 0.2);
        }
    }

    #[test]
    fn test_reload_adds_and_removes_providers() {
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 2)]);
        let changes = recorded(&monitor);
        monitor.register_call("claude");
        monitor.register_call("claude");

        let configured = monitor.reload(&[provider("gemini", 5)]);
        assert_eq!(configured, 1);
        assert_eq!(monitor.providers(), vec!["gemini".to_string()]);
        assert!(!monitor.is_configured("claude"));

        let status = monitor.get_status("claude");
        assert_eq!(status.classification, Classification::Normal);
        assert_eq!(
            changes.lock().last().map(|c| (c.old, c.new)),
            Some((Classification::Throttled, Classification::Normal))
        );
    }
}
