//! Configuration fixtures

use quota_sentinel::config::{Config, PresenceConfig, ProviderLimitConfig};

/// Provider limited to `rpm` calls per minute with default thresholds
pub fn provider(name: &str, rpm: u32) -> ProviderLimitConfig {
    ProviderLimitConfig {
        name: name.to_string(),
        rpm: Some(rpm),
        ..Default::default()
    }
}

/// Config with the given providers and debounce interval
pub fn service_config(providers: Vec<ProviderLimitConfig>, debounce_ms: u64) -> Config {
    Config {
        providers,
        presence: PresenceConfig {
            debounce_ms,
            ..Default::default()
        },
        ..Default::default()
    }
}
