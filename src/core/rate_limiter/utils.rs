//! Utility functions for the rate limit monitor

use super::monitor::RateLimitMonitor;
use super::types::ProviderStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

impl RateLimitMonitor {
    /// Re-evaluate every tracked provider at `now`.
    ///
    /// Expired calls are dropped and any classification change is delivered
    /// to listeners, so recovery is observed even when no calls arrive.
    pub fn sweep_at(&self, now: Instant) -> Vec<ProviderStatus> {
        let mut entries: Vec<_> = self
            .providers
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), Arc::clone(entry)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
            .into_iter()
            .map(|(_, entry)| self.evaluate(&mut entry.lock(), now))
            .collect()
    }

    /// Re-evaluate every tracked provider now
    pub fn sweep(&self) -> Vec<ProviderStatus> {
        self.sweep_at(Instant::now())
    }

    /// Statuses of all configured providers, ordered by name
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.sweep()
    }

    /// Start background sweep task
    pub fn start_sweep_task(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let swept = monitor.sweep().len();
                debug!(providers = swept, "Swept provider windows");
            }
        })
    }

    /// Names of configured providers, sorted
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider has rate-limit configuration
    pub fn is_configured(&self, provider: &str) -> bool {
        self.providers.read().contains_key(provider)
    }
}
