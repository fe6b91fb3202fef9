//! Per-provider usage tracking and classification
//!
//! The monitor is the single source of truth for provider quota health. It is
//! built once at startup and shared by `Arc`; request handlers call
//! [`RateLimitMonitor::register_call`] and [`RateLimitMonitor::get_status`],
//! while the status propagator subscribes through
//! [`RateLimitMonitor::register_status_callback`].

use super::callbacks::{CallbackId, CallbackRegistry, StatusCallback};
use super::types::{Classification, ProviderLimits, ProviderStatus, StatusChange};
use super::window::SlidingWindowCounter;
use crate::config::models::provider::ProviderLimitConfig;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mutable bookkeeping of one provider, guarded by its own mutex
#[derive(Debug)]
pub(super) struct ProviderState {
    pub(super) limits: ProviderLimits,
    /// Created on the first registered call
    pub(super) counter: Option<SlidingWindowCounter>,
    /// Last classification observed, `Normal` before any evaluation
    pub(super) last: Classification,
    /// Set once the provider is dropped from the registry
    pub(super) removed: bool,
}

pub(super) type ProviderEntry = Arc<Mutex<ProviderState>>;

/// Rate limit monitor
#[derive(Debug, Default)]
pub struct RateLimitMonitor {
    /// Provider registry; written only when providers are (re)configured
    pub(super) providers: RwLock<HashMap<String, ProviderEntry>>,
    /// Classification change listeners
    pub(super) callbacks: CallbackRegistry,
}

impl RateLimitMonitor {
    /// Create a monitor with no configured providers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a monitor from provider config sections.
    ///
    /// Invalid sections are logged and skipped; those providers behave as
    /// unconfigured.
    pub fn from_configs(configs: &[ProviderLimitConfig]) -> Self {
        let monitor = Self::new();
        for config in configs {
            match ProviderLimits::try_from(config) {
                Ok(limits) => monitor.configure_provider(limits),
                Err(e) => warn!(
                    provider = %config.name,
                    "Ignoring rate-limit configuration: {}",
                    e
                ),
            }
        }
        monitor
    }

    /// Configure or reconfigure a provider.
    ///
    /// Reconfiguring keeps the timestamps of windows whose length did not
    /// change and the last observed classification.
    pub fn configure_provider(&self, limits: ProviderLimits) {
        let mut providers = self.providers.write();
        match providers.get(&limits.provider) {
            Some(entry) => {
                let mut state = entry.lock();
                if let Some(counter) = state.counter.as_mut() {
                    counter.reconfigure(&limits.windows);
                }
                debug!(provider = %limits.provider, "Reconfigured rate limits");
                state.limits = limits;
            }
            None => {
                info!(
                    provider = %limits.provider,
                    windows = limits.windows.len(),
                    "Tracking provider rate limits"
                );
                let provider = limits.provider.clone();
                let state = ProviderState {
                    limits,
                    counter: None,
                    last: Classification::Normal,
                    removed: false,
                };
                providers.insert(provider, Arc::new(Mutex::new(state)));
            }
        }
    }

    /// Stop tracking a provider.
    ///
    /// If its last classification was not `Normal`, listeners receive a
    /// transition back to `Normal`, matching how unconfigured providers are
    /// reported.
    pub fn remove_provider(&self, provider: &str) -> bool {
        let Some(entry) = self.providers.write().remove(provider) else {
            return false;
        };
        let mut state = entry.lock();
        // Callers still holding the entry see an unconfigured provider from now on
        state.removed = true;
        let old = std::mem::replace(&mut state.last, Classification::Normal);
        if old != Classification::Normal {
            self.callbacks.notify(&StatusChange {
                provider: provider.to_string(),
                old,
                new: Classification::Normal,
            });
        }
        info!(provider = %provider, "Stopped tracking provider rate limits");
        true
    }

    /// Apply a fresh set of provider sections, e.g. after a config reload.
    ///
    /// Providers missing from `configs`, or whose new section is invalid, stop
    /// being tracked. Returns the number of providers tracked afterwards.
    pub fn reload(&self, configs: &[ProviderLimitConfig]) -> usize {
        let mut keep = Vec::with_capacity(configs.len());
        for config in configs {
            match ProviderLimits::try_from(config) {
                Ok(limits) => {
                    keep.push(limits.provider.clone());
                    self.configure_provider(limits);
                }
                Err(e) => warn!(
                    provider = %config.name,
                    "Ignoring rate-limit configuration on reload: {}",
                    e
                ),
            }
        }

        for provider in self.providers() {
            if !keep.contains(&provider) {
                self.remove_provider(&provider);
            }
        }

        let tracked = self.providers.read().len();
        info!(providers = tracked, "Rate-limit configuration reloaded");
        tracked
    }

    /// Record a call to `provider` now and return its updated status
    pub fn register_call(&self, provider: &str) -> ProviderStatus {
        self.register_call_at(provider, Instant::now())
    }

    /// Record a call to `provider` at `now` and return its updated status.
    ///
    /// Calls to unconfigured providers are not tracked.
    pub fn register_call_at(&self, provider: &str, now: Instant) -> ProviderStatus {
        match self.entry(provider) {
            Some(entry) => self.record_call(&entry, provider, now),
            None => {
                debug!(provider = %provider, "Call to unconfigured provider");
                ProviderStatus::unconfigured(provider)
            }
        }
    }

    /// Record a call on an entry looked up earlier.
    ///
    /// The provider may have been removed since the lookup; the call is then
    /// dropped like any call to an unconfigured provider.
    pub(super) fn record_call(
        &self,
        entry: &ProviderEntry,
        provider: &str,
        now: Instant,
    ) -> ProviderStatus {
        let mut guard = entry.lock();
        let state = &mut *guard;
        if state.removed {
            debug!(provider = %provider, "Call to provider removed during lookup");
            return ProviderStatus::unconfigured(provider);
        }
        state
            .counter
            .get_or_insert_with(|| SlidingWindowCounter::new(provider, &state.limits.windows))
            .record(now);
        self.evaluate(state, now)
    }

    /// Current status of `provider`
    pub fn get_status(&self, provider: &str) -> ProviderStatus {
        self.get_status_at(provider, Instant::now())
    }

    /// Status of `provider` at `now`; unconfigured providers are `Normal` at 0.0
    pub fn get_status_at(&self, provider: &str, now: Instant) -> ProviderStatus {
        match self.entry(provider) {
            Some(entry) => self.evaluate(&mut entry.lock(), now),
            None => ProviderStatus::unconfigured(provider),
        }
    }

    /// Subscribe to classification transitions.
    ///
    /// Callbacks run synchronously while the provider's lock is held. A
    /// callback must not call back into the monitor for the same provider
    /// (`register_call`, `get_status`, `remove_provider`), or it deadlocks;
    /// hand the change off to a channel instead.
    pub fn register_status_callback(&self, callback: StatusCallback) -> CallbackId {
        self.callbacks.register(callback)
    }

    /// Remove a previously registered listener
    pub fn unregister_status_callback(&self, id: CallbackId) -> bool {
        self.callbacks.unregister(id)
    }

    pub(super) fn entry(&self, provider: &str) -> Option<ProviderEntry> {
        self.providers.read().get(provider).cloned()
    }

    /// Classify the provider and notify listeners on change.
    ///
    /// Runs with the provider's mutex held so transitions of one provider are
    /// delivered in evaluation order.
    pub(super) fn evaluate(&self, state: &mut ProviderState, now: Instant) -> ProviderStatus {
        let provider = state.limits.provider.clone();
        if state.removed {
            return ProviderStatus::unconfigured(&provider);
        }
        let windows = match state.counter.as_mut() {
            Some(counter) => counter.usages(now),
            None => SlidingWindowCounter::new(provider.as_str(), &state.limits.windows)
                .usages(now),
        };
        let usage_ratio = windows.iter().map(|w| w.ratio).fold(0.0_f64, f64::max);
        let classification = state.limits.thresholds.classify(usage_ratio);

        if classification != state.last {
            let change = StatusChange {
                provider: provider.clone(),
                old: state.last,
                new: classification,
            };
            state.last = classification;
            info!(
                provider = %provider,
                old = %change.old,
                new = %change.new,
                usage_ratio,
                "Provider classification changed"
            );
            self.callbacks.notify(&change);
        } else {
            debug!(provider = %provider, usage_ratio, %classification, "Provider evaluated");
        }

        ProviderStatus {
            provider,
            usage_ratio,
            classification,
            windows,
        }
    }
}

