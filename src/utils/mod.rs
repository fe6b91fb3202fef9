//! Utility modules for the sentinel
//!
//! - **config**: environment variable helpers
//! - **error**: the shared error type
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::EnvUtils;
pub use logging::init_logging;
