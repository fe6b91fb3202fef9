//! Threshold classification of usage ratios

use super::types::Classification;
use crate::utils::error::{Result, SentinelError};
use serde::Serialize;

/// Default ratio at which a provider turns `Warning`
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.75;
/// Default ratio at which a provider turns `Throttled`
pub const DEFAULT_THROTTLED_THRESHOLD: f64 = 1.0;

/// Warning/throttled ratio pair, `0 < warning < throttled`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    warning: f64,
    throttled: f64,
}

impl Thresholds {
    /// Validate and build a threshold pair
    pub fn new(warning: f64, throttled: f64) -> Result<Self> {
        if !warning.is_finite() || !throttled.is_finite() {
            return Err(SentinelError::config("Thresholds must be finite numbers"));
        }
        if warning <= 0.0 || throttled <= 0.0 {
            return Err(SentinelError::config("Thresholds must be greater than 0"));
        }
        if warning >= throttled {
            return Err(SentinelError::config(format!(
                "Warning threshold {} must be below throttled threshold {}",
                warning, throttled
            )));
        }
        Ok(Self { warning, throttled })
    }

    pub fn warning(&self) -> f64 {
        self.warning
    }

    pub fn throttled(&self) -> f64 {
        self.throttled
    }

    /// Classify a usage ratio against this pair
    #[inline]
    pub fn classify(&self, ratio: f64) -> Classification {
        classify(ratio, self.warning, self.throttled)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: DEFAULT_WARNING_THRESHOLD,
            throttled: DEFAULT_THROTTLED_THRESHOLD,
        }
    }
}

/// Map a usage ratio to a classification.
///
/// Lower bounds are inclusive: a ratio equal to a threshold takes the more
/// severe classification.
pub fn classify(ratio: f64, warning: f64, throttled: f64) -> Classification {
    if ratio >= throttled {
        Classification::Throttled
    } else if ratio >= warning {
        Classification::Warning
    } else {
        Classification::Normal
    }
}
