//! Rate limiter types and data structures

use super::classifier::Thresholds;
use super::window::WindowLimit;
use crate::config::models::provider::ProviderLimitConfig;
use crate::config::validation::Validate;
use crate::utils::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a provider's quota, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Usage below the warning threshold
    #[default]
    Normal,
    /// Usage at or above the warning threshold
    Warning,
    /// Usage at or above the throttled threshold
    Throttled,
}

impl Classification {
    /// Name used in logs and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Normal => "normal",
            Classification::Warning => "warning",
            Classification::Throttled => "throttled",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage of a single window at evaluation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowUsage {
    /// Window length in seconds
    pub window_secs: f64,
    /// Calls inside the window
    pub count: u32,
    /// Configured maximum
    pub limit: u32,
    /// `count / limit`
    pub ratio: f64,
}

/// Point-in-time status of a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatus {
    /// Provider identifier
    pub provider: String,
    /// Highest ratio across all configured windows
    pub usage_ratio: f64,
    /// Classification of `usage_ratio`
    pub classification: Classification,
    /// Per-window detail, empty for unconfigured providers
    pub windows: Vec<WindowUsage>,
}

impl ProviderStatus {
    /// Status reported for a provider without rate-limit configuration
    pub fn unconfigured(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            usage_ratio: 0.0,
            classification: Classification::Normal,
            windows: Vec::new(),
        }
    }
}

/// Classification transition delivered to status callbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub provider: String,
    pub old: Classification,
    pub new: Classification,
}

/// Validated rate limits of one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLimits {
    pub provider: String,
    pub windows: Vec<WindowLimit>,
    pub thresholds: Thresholds,
}

impl ProviderLimits {
    /// Create limits, rejecting an empty provider name or an empty window list
    pub fn new(
        provider: impl Into<String>,
        windows: Vec<WindowLimit>,
        thresholds: Thresholds,
    ) -> Result<Self> {
        let provider = provider.into();
        if provider.trim().is_empty() {
            return Err(SentinelError::config("Provider name cannot be empty"));
        }
        if windows.is_empty() {
            return Err(SentinelError::config(format!(
                "Provider {} has no rate-limit windows",
                provider
            )));
        }
        Ok(Self {
            provider,
            windows,
            thresholds,
        })
    }
}

impl TryFrom<&ProviderLimitConfig> for ProviderLimits {
    type Error = SentinelError;

    fn try_from(config: &ProviderLimitConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SentinelError::config(format!("Provider {}: {}", config.name, e)))?;

        let windows = config
            .window_limits()
            .into_iter()
            .map(|(window, limit)| WindowLimit::new(window, limit))
            .collect::<Result<Vec<_>>>()?;
        let thresholds = Thresholds::new(config.warning_threshold, config.throttled_threshold)?;

        Self::new(config.name.clone(), windows, thresholds)
    }
}
