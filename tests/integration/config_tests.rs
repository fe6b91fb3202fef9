//! Configuration files driving the monitor and the service

#[cfg(test)]
mod tests {
    use crate::common::RecordingPresenceClient;
    use quota_sentinel::config::Config;
    use quota_sentinel::core::presence::PresenceClient;
    use quota_sentinel::server::ServiceBuilder;
    use quota_sentinel::{Classification, RateLimitMonitor, SentinelError};
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Instant;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"
providers:
  - name: "claude"
    rpm: 4
  - name: "broken"
    rpm: 10
    warning_threshold: 0.9
    throttled_threshold: 0.5
  - name: "batch"
    windows:
      - seconds: 600
        limit: 10
    warning_threshold: 0.5

presence:
  debounce_ms: 1000
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_file_config_drives_monitor() {
        let file = write_config(CONFIG);
        let config = Config::load(Some(file.path())).await.unwrap();
        assert_eq!(config.presence().debounce_ms, 1000);

        let monitor = RateLimitMonitor::from_configs(config.providers());
        assert_eq!(monitor.providers(), vec!["batch".to_string(), "claude".to_string()]);

        let now = Instant::now();
        for _ in 0..5 {
            monitor.register_call_at("batch", now);
            monitor.register_call_at("broken", now);
        }
        assert_eq!(
            monitor.get_status_at("batch", now).classification,
            Classification::Warning
        );

        // Invalid thresholds leave the provider unconfigured
        let broken = monitor.get_status_at("broken", now);
        assert_eq!(broken.classification, Classification::Normal);
        assert_eq!(broken.usage_ratio, 0.0);
        assert!(broken.windows.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_config_error() {
        let file = write_config("providers: [name: claude");
        let err = Config::load(Some(file.path())).await.unwrap_err();
        assert!(matches!(err, SentinelError::Config(_)));
    }

    #[tokio::test]
    async fn test_service_reload_from_file() {
        let file = write_config(CONFIG);
        let config = Config::load(Some(file.path())).await.unwrap();
        let client = Arc::new(RecordingPresenceClient::new());
        let service = ServiceBuilder::new()
            .with_config(config)
            .with_presence_client(client as Arc<dyn PresenceClient>)
            .build()
            .unwrap();

        for _ in 0..2 {
            service.monitor().register_call("claude");
        }

        let updated = write_config(
            r#"
providers:
  - name: "claude"
    rpm: 2
  - name: "gemini"
    rpd: 500
"#,
        );
        let reloaded = Config::load(Some(updated.path())).await.unwrap();
        assert_eq!(service.reload(&reloaded), 2);

        let monitor = service.monitor();
        assert!(monitor.is_configured("gemini"));
        assert!(!monitor.is_configured("batch"));

        // Calls recorded before the reload count against the new limit
        let status = monitor.get_status("claude");
        assert_eq!(status.usage_ratio, 1.0);
        assert_eq!(status.classification, Classification::Throttled);

        service.shutdown().await.unwrap();
    }
}
