//! Rate Limit Monitoring
//!
//! Sliding window call accounting per provider, threshold classification and
//! change notification.

mod callbacks;
mod classifier;
mod monitor;
mod types;
mod utils;
mod window;


// Re-export public types
pub use callbacks::{CallbackId, CallbackRegistry, StatusCallback, status_callback};
pub use classifier::{
    DEFAULT_THROTTLED_THRESHOLD, DEFAULT_WARNING_THRESHOLD, Thresholds, classify,
};
pub use monitor::RateLimitMonitor;
pub use types::{Classification, ProviderLimits, ProviderStatus, StatusChange, WindowUsage};
pub use window::{SlidingWindow, SlidingWindowCounter, WindowLimit};
