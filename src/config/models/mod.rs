//! Configuration data models
//!
//! This module defines all configuration structures used by the sentinel.

#![allow(missing_docs)]

pub mod logging;
pub mod presence;
pub mod provider;
pub mod server;

// Re-export all configuration types
pub use logging::*;
pub use presence::*;
pub use provider::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default debounce interval in milliseconds
pub fn default_debounce_ms() -> u64 {
    5000
}

/// Default provider sweep interval in seconds
pub fn default_sweep_interval_secs() -> u64 {
    15
}

pub fn default_warning_threshold() -> f64 {
    crate::core::rate_limiter::DEFAULT_WARNING_THRESHOLD
}

pub fn default_throttled_threshold() -> f64 {
    crate::core::rate_limiter::DEFAULT_THROTTLED_THRESHOLD
}

pub fn default_ready_label() -> String {
    "API: Ready".to_string()
}

pub fn default_busy_label() -> String {
    "API: Busy".to_string()
}

pub fn default_throttled_label() -> String {
    "API: Throttled".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
