//! Error handling for the sentinel
//!
//! This module defines the error type shared by the monitor, the propagator,
//! the configuration layer and the HTTP surface.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{Result, SentinelError};
