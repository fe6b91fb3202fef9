//! Presence propagation configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Presence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Minimum time between presence updates in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Webhook receiving presence updates; updates are only logged when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Labels shown next to the presence state
    #[serde(default)]
    pub labels: PresenceLabels,
    /// How often every provider is re-evaluated, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            webhook_url: None,
            labels: PresenceLabels::default(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl PresenceConfig {
    /// Merge presence configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.debounce_ms != default_debounce_ms() {
            self.debounce_ms = other.debounce_ms;
        }
        if other.webhook_url.is_some() {
            self.webhook_url = other.webhook_url;
        }
        if other.labels != PresenceLabels::default() {
            self.labels = other.labels;
        }
        if other.sweep_interval_secs != default_sweep_interval_secs() {
            self.sweep_interval_secs = other.sweep_interval_secs;
        }
        self
    }
}

/// Presence labels per classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceLabels {
    #[serde(default = "default_ready_label")]
    pub ready: String,
    #[serde(default = "default_busy_label")]
    pub busy: String,
    #[serde(default = "default_throttled_label")]
    pub throttled: String,
}

impl Default for PresenceLabels {
    fn default() -> Self {
        Self {
            ready: default_ready_label(),
            busy: default_busy_label(),
            throttled: default_throttled_label(),
        }
    }
}
