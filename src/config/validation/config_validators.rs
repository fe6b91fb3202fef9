//! Configuration section validators

use super::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

const MAX_DEBOUNCE_MS: u64 = 3_600_000;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        let limits = self.window_limits();
        if limits.is_empty() {
            return Err("At least one of rpm, rpd or windows must be set".to_string());
        }

        let mut seen = HashSet::new();
        for (window, limit) in &limits {
            if window.is_zero() {
                return Err("Window length must be greater than 0 seconds".to_string());
            }
            if *limit == 0 {
                return Err(format!(
                    "Limit for the {}s window must be greater than 0",
                    window.as_secs()
                ));
            }
            if !seen.insert(*window) {
                return Err(format!(
                    "Duplicate {}s window (rpm and rpd count as 60s and 86400s windows)",
                    window.as_secs()
                ));
            }
        }

        if !self.warning_threshold.is_finite() || !self.throttled_threshold.is_finite() {
            return Err("Thresholds must be finite numbers".to_string());
        }
        if self.warning_threshold <= 0.0 {
            return Err("Warning threshold must be greater than 0".to_string());
        }
        if self.warning_threshold >= self.throttled_threshold {
            return Err(format!(
                "Warning threshold {} must be below throttled threshold {}",
                self.warning_threshold, self.throttled_threshold
            ));
        }

        Ok(())
    }
}

impl Validate for PresenceLabels {
    fn validate(&self) -> Result<(), String> {
        for (name, label) in [
            ("ready", &self.ready),
            ("busy", &self.busy),
            ("throttled", &self.throttled),
        ] {
            if label.trim().is_empty() {
                return Err(format!("Presence label '{}' cannot be empty", name));
            }
        }
        Ok(())
    }
}

impl Validate for PresenceConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating presence configuration");

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err("Debounce interval should not exceed 1 hour".to_string());
        }

        if self.sweep_interval_secs == 0 {
            return Err("Sweep interval must be greater than 0".to_string());
        }

        if let Some(webhook_url) = &self.webhook_url {
            let url = url::Url::parse(webhook_url)
                .map_err(|e| format!("Invalid presence webhook URL: {}", e))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "Presence webhook URL must use http or https, got {}",
                    url.scheme()
                ));
            }
        }

        self.labels.validate()
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }
}
