//! Status propagation to the presence surface
//!
//! The propagator folds every provider's classification into a single
//! presence, debounces updates and forwards them to a [`PresenceClient`].

mod client;
mod debounce;
mod propagator;
mod types;


pub use client::{LogPresenceClient, PresenceClient, WebhookPresenceClient};
pub use debounce::{DebounceState, DebounceTimer, Decision};
pub use propagator::StatusPropagator;
pub use types::{PresenceState, PresenceUpdate, PropagatorConfig, PropagatorSnapshot};

use crate::config::models::presence::PresenceConfig;
use crate::utils::error::Result;
use std::sync::Arc;

/// Build the presence client selected by `config`
pub fn client_from_config(config: &PresenceConfig) -> Result<Arc<dyn PresenceClient>> {
    match &config.webhook_url {
        Some(url) => Ok(Arc::new(WebhookPresenceClient::new(url.clone())?)),
        None => Ok(Arc::new(LogPresenceClient)),
    }
}
