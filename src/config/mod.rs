//! Configuration management for the sentinel
//!
//! Configuration is read from a YAML file, then environment overrides are
//! applied on top of it.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::config::EnvUtils;
use crate::utils::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

pub const ENV_HOST: &str = "QUOTA_SENTINEL_HOST";
pub const ENV_PORT: &str = "QUOTA_SENTINEL_PORT";
pub const ENV_DEBOUNCE_MS: &str = "QUOTA_SENTINEL_DEBOUNCE_MS";
pub const ENV_PRESENCE_WEBHOOK: &str = "QUOTA_SENTINEL_PRESENCE_WEBHOOK";
pub const ENV_LOG_LEVEL: &str = "QUOTA_SENTINEL_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "QUOTA_SENTINEL_LOG_JSON";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Rate limits per provider
    #[serde(default)]
    pub providers: Vec<ProviderLimitConfig>,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SentinelError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| SentinelError::config(format!("Failed to parse config: {}", e)))
    }

    /// Load the file if given, apply environment overrides, then validate
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        let config = config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QUOTA_SENTINEL_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(EnvUtils::get_env)
    }

    /// Apply overrides read through `lookup`
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = EnvUtils::parse_value(ENV_PORT, &port)?;
        }
        if let Some(debounce_ms) = lookup(ENV_DEBOUNCE_MS) {
            self.presence.debounce_ms = EnvUtils::parse_value(ENV_DEBOUNCE_MS, &debounce_ms)?;
        }
        if let Some(webhook_url) = lookup(ENV_PRESENCE_WEBHOOK) {
            self.presence.webhook_url = Some(webhook_url);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            self.logging.json = EnvUtils::parse_bool(&json);
        }
        Ok(self)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Get provider rate limits
    pub fn providers(&self) -> &[ProviderLimitConfig] {
        &self.providers
    }

    /// Get presence configuration
    pub fn presence(&self) -> &PresenceConfig {
        &self.presence
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Validate the configuration.
    ///
    /// Provider sections are only checked for duplicates here; each one is
    /// validated when the monitor is configured so that a bad provider does not
    /// prevent startup.
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| SentinelError::config(format!("Server config error: {}", e)))?;

        self.presence
            .validate()
            .map_err(|e| SentinelError::config(format!("Presence config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| SentinelError::config(format!("Logging config error: {}", e)))?;

        let mut names = HashSet::new();
        for provider in &self.providers {
            if !names.insert(provider.name.as_str()) {
                warn!(
                    provider = %provider.name,
                    "Duplicate provider section, the last one wins"
                );
            }
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.presence = self.presence.merge(other.presence);
        self.logging = self.logging.merge(other.logging);

        // Provider sections of `other` replace ours by name
        for provider in other.providers {
            match self.providers.iter_mut().find(|p| p.name == provider.name) {
                Some(existing) => *existing = provider,
                None => self.providers.push(provider),
            }
        }
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SentinelError::config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| SentinelError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
