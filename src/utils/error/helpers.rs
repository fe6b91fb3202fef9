//! Helper functions for creating specific error types

use super::types::SentinelError;
use crate::core::rate_limiter::Classification;

impl SentinelError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn presence<S: Into<String>>(message: S) -> Self {
        Self::Presence(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn listener<P, S>(provider: P, old: Classification, new: Classification, message: S) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self::Listener {
            provider: provider.into(),
            old,
            new,
            message: message.into(),
        }
    }
}
