//! Presence types and data structures

use crate::config::models::presence::{PresenceConfig, PresenceLabels};
use crate::core::rate_limiter::Classification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Presence shown on the external display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceState {
    Online,
    Idle,
    DoNotDisturb,
}

impl PresenceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceState::Online => "online",
            PresenceState::Idle => "idle",
            PresenceState::DoNotDisturb => "do_not_disturb",
        }
    }
}

impl From<Classification> for PresenceState {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Normal => PresenceState::Online,
            Classification::Warning => PresenceState::Idle,
            Classification::Throttled => PresenceState::DoNotDisturb,
        }
    }
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State and label handed to the presence client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceUpdate {
    pub state: PresenceState,
    pub label: String,
}

impl PresenceUpdate {
    /// Map a classification to its presence using the configured labels
    pub fn for_classification(classification: Classification, labels: &PresenceLabels) -> Self {
        let label = match classification {
            Classification::Normal => &labels.ready,
            Classification::Warning => &labels.busy,
            Classification::Throttled => &labels.throttled,
        };
        Self {
            state: classification.into(),
            label: label.clone(),
        }
    }
}

/// Propagator settings
#[derive(Debug, Clone)]
pub struct PropagatorConfig {
    /// Minimum time between two presence updates
    pub debounce: Duration,
    pub labels: PresenceLabels,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(5000),
            labels: PresenceLabels::default(),
        }
    }
}

impl From<&PresenceConfig> for PropagatorConfig {
    fn from(config: &PresenceConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            labels: config.labels.clone(),
        }
    }
}

/// Observable state of the propagator worker
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropagatorSnapshot {
    /// Latest classification reported per provider
    pub providers: HashMap<String, Classification>,
    /// Worst classification across providers
    pub folded: Classification,
    /// Classification last accepted by the presence client
    pub last_applied: Option<Classification>,
    /// Wall-clock time of the last successful update
    pub last_applied_at: Option<DateTime<Utc>>,
    /// Classification waiting for the debounce interval to end or for a retry
    pub pending: Option<Classification>,
    /// Successful presence updates
    pub applied_updates: u64,
    /// Failed presence updates
    pub failed_updates: u64,
}

/// Messages consumed by the propagator worker
#[derive(Debug)]
pub(super) enum PropagatorMessage {
    Change(crate::core::rate_limiter::StatusChange),
    Shutdown,
}
