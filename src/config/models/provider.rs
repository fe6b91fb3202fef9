//! Provider rate-limit configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MINUTE_SECS: u64 = 60;
const DAY_SECS: u64 = 86_400;

/// Rate limits of one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderLimitConfig {
    /// Provider identifier
    pub name: String,
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,
    /// Requests per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,
    /// Additional windows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<WindowConfig>,
    /// Usage ratio at which the provider turns `warning`
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,
    /// Usage ratio at which the provider turns `throttled`
    #[serde(default = "default_throttled_threshold")]
    pub throttled_threshold: f64,
}

impl Default for ProviderLimitConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            rpm: None,
            rpd: None,
            windows: Vec::new(),
            warning_threshold: default_warning_threshold(),
            throttled_threshold: default_throttled_threshold(),
        }
    }
}

impl ProviderLimitConfig {
    /// All configured `(window, limit)` pairs: `rpm`, then `rpd`, then `windows`
    pub fn window_limits(&self) -> Vec<(Duration, u32)> {
        let shorthand = [(MINUTE_SECS, self.rpm), (DAY_SECS, self.rpd)];
        shorthand
            .into_iter()
            .filter_map(|(secs, limit)| limit.map(|limit| (Duration::from_secs(secs), limit)))
            .chain(
                self.windows
                    .iter()
                    .map(|w| (Duration::from_secs(w.seconds), w.limit)),
            )
            .collect()
    }
}

/// A custom window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window length in seconds
    pub seconds: u64,
    /// Maximum calls inside the window
    pub limit: u32,
}
