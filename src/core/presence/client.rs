//! Presence client implementations

use super::types::PresenceUpdate;
use crate::utils::error::{Result, SentinelError};
use std::time::Duration;
use tracing::info;

/// External surface that displays the presence
#[async_trait::async_trait]
pub trait PresenceClient: Send + Sync + std::fmt::Debug {
    /// Set the displayed presence
    async fn set_presence(&self, update: &PresenceUpdate) -> Result<()>;

    /// Get client name
    fn name(&self) -> &str;
}

/// Client that only logs updates
#[derive(Debug, Default)]
pub struct LogPresenceClient;

#[async_trait::async_trait]
impl PresenceClient for LogPresenceClient {
    async fn set_presence(&self, update: &PresenceUpdate) -> Result<()> {
        info!(state = %update.state, label = %update.label, "Presence updated");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Client that POSTs updates to a webhook
#[derive(Debug)]
pub struct WebhookPresenceClient {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookPresenceClient {
    /// Create a new webhook presence client
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait::async_trait]
impl PresenceClient for WebhookPresenceClient {
    async fn set_presence(&self, update: &PresenceUpdate) -> Result<()> {
        let payload = serde_json::json!({
            "state": update.state,
            "label": update.label,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SentinelError::presence(format!("Failed to send presence update: {}", e)))?;

        if !response.status().is_success() {
            return Err(SentinelError::presence(format!(
                "Presence webhook returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
