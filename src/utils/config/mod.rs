//! Environment variable utilities

use crate::utils::error::{Result, SentinelError};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Environment variable utilities
pub struct EnvUtils;

impl EnvUtils {
    /// Get a non-empty environment variable
    pub fn get_env(key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Parse a raw value read from `key`
    pub fn parse_value<T>(key: &str, value: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        value
            .parse()
            .map_err(|e| SentinelError::config(format!("Invalid value for {}: {}", key, e)))
    }

    /// Parse a boolean the way shells usually spell it
    pub fn parse_bool(value: &str) -> bool {
        matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
    }

    /// Load a `.env` file from the working directory or its parents, if any
    pub fn load_dotenv() -> Option<PathBuf> {
        match dotenvy::dotenv() {
            Ok(path) => {
                debug!("Loaded environment from {:?}", path);
                Some(path)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        let port: u16 = EnvUtils::parse_value("PORT", "8080").unwrap();
        assert_eq!(port, 8080);

        let err = EnvUtils::parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("Invalid value for PORT"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(EnvUtils::parse_bool("TRUE"));
        assert!(EnvUtils::parse_bool("1"));
        assert!(!EnvUtils::parse_bool("off"));
    }

    #[test]
    fn test_missing_env_is_none() {
        assert_eq!(EnvUtils::get_env("QUOTA_SENTINEL_TEST_SURELY_UNSET"), None);
    }
}
