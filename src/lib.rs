//! # quota-sentinel
//!
//! Tracks calls to rate-limited AI providers over sliding windows, classifies
//! each provider as normal, warning or throttled, and propagates the worst
//! classification to a presence surface with debouncing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quota_sentinel::config::ProviderLimitConfig;
//! use quota_sentinel::core::presence::{LogPresenceClient, PropagatorConfig, StatusPropagator};
//! use quota_sentinel::core::rate_limiter::RateLimitMonitor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let monitor = RateLimitMonitor::from_configs(&[ProviderLimitConfig {
//!         name: "claude".to_string(),
//!         rpm: Some(50),
//!         ..Default::default()
//!     }]);
//!
//!     let propagator =
//!         StatusPropagator::start(Arc::new(LogPresenceClient), PropagatorConfig::default());
//!     propagator.attach(&monitor);
//!
//!     let status = monitor.register_call("claude");
//!     println!("{} is {}", status.provider, status.classification);
//!
//!     propagator.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::core::presence::{PresenceClient, PresenceUpdate, StatusPropagator};
pub use crate::core::rate_limiter::{Classification, ProviderStatus, RateLimitMonitor, StatusChange};
pub use crate::utils::error::{Result, SentinelError};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
