//! Monitor to presence propagation, end to end

#[cfg(test)]
mod tests {
    use crate::common::{RecordingPresenceClient, advance, provider, service_config, settle};
    use quota_sentinel::core::presence::{
        PresenceClient, PresenceState, PropagatorConfig, PropagatorSnapshot, StatusPropagator,
    };
    use quota_sentinel::server::ServiceBuilder;
    use quota_sentinel::{Classification, RateLimitMonitor};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use PresenceState::{DoNotDisturb, Idle, Online};

    const DEBOUNCE: Duration = Duration::from_secs(5);

    fn start(client: &Arc<RecordingPresenceClient>) -> StatusPropagator {
        let config = PropagatorConfig {
            debounce: DEBOUNCE,
            ..Default::default()
        };
        StatusPropagator::start(Arc::clone(client) as Arc<dyn PresenceClient>, config)
    }

    async fn wait_for<F>(mut snapshots: watch::Receiver<PropagatorSnapshot>, condition: F)
    where
        F: FnMut(&PropagatorSnapshot) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), snapshots.wait_for(condition))
            .await
            .expect("propagator did not reach the expected state")
            .expect("propagator stopped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_transitions_reach_presence_client() {
        let client = Arc::new(RecordingPresenceClient::new());
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 4)]);
        let propagator = start(&client);
        propagator.attach(&monitor);
        settle().await;

        for _ in 0..3 {
            monitor.register_call("claude");
        }
        settle().await;
        assert_eq!(client.states(), vec![Online, Idle]);

        // Inside the debounce interval, held back
        monitor.register_call("claude");
        settle().await;
        assert_eq!(client.states(), vec![Online, Idle]);
        assert_eq!(propagator.snapshot().pending, Some(Classification::Throttled));

        advance(DEBOUNCE).await;
        assert_eq!(client.states(), vec![Online, Idle, DoNotDisturb]);
        assert_eq!(
            client.labels(),
            vec!["API: Ready", "API: Busy", "API: Throttled"]
        );

        propagator.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_worst_provider_drives_presence() {
        let client = Arc::new(RecordingPresenceClient::new());
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 1), provider("gemini", 4)]);
        let propagator = start(&client);
        propagator.attach(&monitor);
        settle().await;

        monitor.register_call("claude");
        settle().await;
        assert_eq!(client.states(), vec![Online, DoNotDisturb]);

        for _ in 0..3 {
            monitor.register_call("gemini");
        }
        settle().await;
        advance(DEBOUNCE).await;
        assert_eq!(client.states(), vec![Online, DoNotDisturb]);

        let snapshot = propagator.snapshot();
        assert_eq!(snapshot.folded, Classification::Throttled);
        assert_eq!(snapshot.providers.get("gemini"), Some(&Classification::Warning));

        // Dropping the throttled provider leaves the warning one in charge
        monitor.reload(&[provider("gemini", 4)]);
        settle().await;
        assert_eq!(client.states(), vec![Online, DoNotDisturb, Idle]);

        propagator.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_update_is_retried_on_next_change() {
        let client = Arc::new(RecordingPresenceClient::new());
        let monitor = RateLimitMonitor::from_configs(&[provider("claude", 4)]);
        let propagator = start(&client);
        propagator.attach(&monitor);
        settle().await;

        client.set_failing(true);
        for _ in 0..3 {
            monitor.register_call("claude");
        }
        settle().await;
        let snapshot = propagator.snapshot();
        assert_eq!(snapshot.failed_updates, 1);
        assert_eq!(snapshot.pending, Some(Classification::Warning));
        assert_eq!(snapshot.last_applied, Some(Classification::Normal));

        client.set_failing(false);
        monitor.register_call("claude");
        settle().await;
        assert_eq!(client.states(), vec![Online, DoNotDisturb]);
        assert_eq!(client.attempts(), 3);
        assert_eq!(propagator.snapshot().pending, None);

        propagator.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_shutdown_flushes_pending_presence() {
        let client = Arc::new(RecordingPresenceClient::new());
        let service = ServiceBuilder::new()
            .with_config(service_config(vec![provider("claude", 4)], 5000))
            .with_presence_client(Arc::clone(&client) as Arc<dyn PresenceClient>)
            .build()
            .unwrap();
        settle().await;

        let monitor = service.monitor();
        for _ in 0..4 {
            monitor.register_call("claude");
        }
        settle().await;
        assert_eq!(client.states(), vec![Online, Idle]);

        service.shutdown().await.unwrap();
        assert_eq!(client.states(), vec![Online, Idle, DoNotDisturb]);
        assert_eq!(service.propagator().snapshot().applied_updates, 3);
    }

    #[tokio::test]
    async fn test_webhook_receives_presence_updates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/presence"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut config = service_config(vec![provider("claude", 4)], 50);
        config.presence.webhook_url = Some(format!("{}/presence", server.uri()));
        let service = ServiceBuilder::new().with_config(config).build().unwrap();

        for _ in 0..3 {
            service.monitor().register_call("claude");
        }
        wait_for(service.propagator().subscribe(), |s| {
            s.last_applied == Some(Classification::Warning)
        })
        .await;
        service.shutdown().await.unwrap();

        let states: Vec<String> = server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<serde_json::Value>().ok())
            .filter_map(|body| body["state"].as_str().map(str::to_string))
            .collect();
        assert_eq!(states, vec!["online", "idle"]);
    }

    #[tokio::test]
    async fn test_webhook_outage_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "state": "do_not_disturb" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = service_config(vec![provider("claude", 4)], 50);
        config.presence.webhook_url = Some(server.uri());
        let service = ServiceBuilder::new().with_config(config).build().unwrap();

        // Baseline fails first
        wait_for(service.propagator().subscribe(), |s| s.failed_updates == 1).await;

        for _ in 0..3 {
            service.monitor().register_call("claude");
        }
        wait_for(service.propagator().subscribe(), |s| s.failed_updates == 2).await;
        assert_eq!(
            service.propagator().snapshot().pending,
            Some(Classification::Warning)
        );

        service.monitor().register_call("claude");
        wait_for(service.propagator().subscribe(), |s| {
            s.last_applied == Some(Classification::Throttled)
        })
        .await;

        let snapshot = service.propagator().snapshot();
        assert_eq!(snapshot.pending, None);
        assert_eq!(snapshot.applied_updates, 1);
        assert!(snapshot.last_applied_at.is_some());

        service.shutdown().await.unwrap();
    }
}
