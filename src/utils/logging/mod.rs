//! Tracing subscriber setup

use crate::config::models::LoggingConfig;
use crate::utils::error::{Result, SentinelError};
use tracing::Dispatch;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter from `RUST_LOG`, falling back to the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Human-readable subscriber with default settings.
///
/// Used while the configuration, and with it the real logging settings, is
/// still being loaded.
pub fn bootstrap_dispatch() -> Dispatch {
    Dispatch::new(
        tracing_subscriber::registry()
            .with(env_filter(&LoggingConfig::default()))
            .with(fmt::layer().with_target(false)),
    )
}

/// Install the global subscriber; fails if one is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config);

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init()
    };

    installed.map_err(|e| SentinelError::internal(format!("Failed to initialize logging: {}", e)))
}
