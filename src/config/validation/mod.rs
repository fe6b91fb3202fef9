//! Configuration validation
//!
//! Every configuration section implements [`Validate`]. Errors are plain
//! strings; callers wrap them into `SentinelError::Config` with the section
//! name.

mod config_validators;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
