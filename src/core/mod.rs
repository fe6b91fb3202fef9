//! Core functionality
//!
//! Rate-limit accounting and classification live in [`rate_limiter`]; the
//! debounced propagation of the resulting status lives in [`presence`].

pub mod presence;
pub mod rate_limiter;
