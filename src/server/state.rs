//! Application state shared across HTTP handlers

use crate::core::presence::StatusPropagator;
use crate::core::rate_limiter::RateLimitMonitor;
use std::sync::Arc;

/// HTTP server state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Rate limit monitor
    pub monitor: Arc<RateLimitMonitor>,
    /// Status propagator, read for the presence endpoint
    pub propagator: Arc<StatusPropagator>,
}

impl AppState {
    pub fn new(monitor: Arc<RateLimitMonitor>, propagator: Arc<StatusPropagator>) -> Self {
        Self {
            monitor,
            propagator,
        }
    }
}
