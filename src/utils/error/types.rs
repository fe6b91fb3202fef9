//! Error types for the sentinel

use crate::core::rate_limiter::Classification;
use thiserror::Error;

/// Result type alias for the sentinel
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Main error type for the sentinel
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Configuration errors (bad limits, windows, thresholds or files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A status listener returned an error or panicked
    #[error("Listener error for provider {provider} ({old} -> {new}): {message}")]
    Listener {
        provider: String,
        old: Classification,
        new: Classification,
        message: String,
    },

    /// The external presence client rejected or failed an update
    #[error("Presence error: {0}")]
    Presence(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
