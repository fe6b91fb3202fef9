//! Debounced propagation of provider classifications to the presence client

use super::client::PresenceClient;
use super::debounce::{DebounceState, DebounceTimer, Decision};
use super::types::{PresenceUpdate, PropagatorConfig, PropagatorMessage, PropagatorSnapshot};
use crate::core::rate_limiter::{
    CallbackId, Classification, RateLimitMonitor, StatusChange, status_callback,
};
use crate::utils::error::{Result, SentinelError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Handle to the propagator worker
#[derive(Debug)]
pub struct StatusPropagator {
    sender: mpsc::UnboundedSender<PropagatorMessage>,
    snapshot: watch::Receiver<PropagatorSnapshot>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl StatusPropagator {
    /// Spawn the worker; the `Normal` baseline is applied before any event
    pub fn start(client: Arc<dyn PresenceClient>, config: PropagatorConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(PropagatorSnapshot::default());

        info!(
            client = client.name(),
            debounce_ms = config.debounce.as_millis() as u64,
            "Starting status propagator"
        );

        let worker = PropagatorWorker {
            state: DebounceState::new(config.debounce),
            timer: DebounceTimer::new(),
            providers: HashMap::new(),
            client,
            config,
            snapshot: snapshot_tx,
            applied_updates: 0,
            failed_updates: 0,
        };
        let handle = tokio::spawn(worker.run(receiver));

        Self {
            sender,
            snapshot,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Subscribe to `monitor`; the callback only enqueues the change
    pub fn attach(&self, monitor: &RateLimitMonitor) -> CallbackId {
        let sender = self.sender.clone();
        monitor.register_status_callback(status_callback(move |change| {
            sender
                .send(PropagatorMessage::Change(change.clone()))
                .map_err(|_| {
                    SentinelError::listener(
                        change.provider.clone(),
                        change.old,
                        change.new,
                        "status propagator has stopped",
                    )
                })
        }))
    }

    /// Feed a change directly, without a monitor
    pub fn notify(&self, change: StatusChange) -> Result<()> {
        self.sender
            .send(PropagatorMessage::Change(change))
            .map_err(|_| SentinelError::internal("Status propagator has stopped"))
    }

    /// Latest observable worker state
    pub fn snapshot(&self) -> PropagatorSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch worker state changes
    pub fn subscribe(&self) -> watch::Receiver<PropagatorSnapshot> {
        self.snapshot.clone()
    }

    /// Stop the worker after a best-effort flush of any pending value
    pub async fn shutdown(&self) -> Result<()> {
        let Some(handle) = self.worker.lock().take() else {
            return Ok(());
        };
        // The worker may already be gone; joining below still reports its outcome
        let _ = self.sender.send(PropagatorMessage::Shutdown);
        handle
            .await
            .map_err(|e| SentinelError::internal(format!("Status propagator task failed: {}", e)))
    }
}

struct PropagatorWorker {
    client: Arc<dyn PresenceClient>,
    config: PropagatorConfig,
    providers: HashMap<String, Classification>,
    state: DebounceState,
    timer: DebounceTimer,
    snapshot: watch::Sender<PropagatorSnapshot>,
    applied_updates: u64,
    failed_updates: u64,
}

impl PropagatorWorker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<PropagatorMessage>) {
        self.apply_baseline().await;

        loop {
            tokio::select! {
                message = receiver.recv() => match message {
                    Some(PropagatorMessage::Change(change)) => self.on_change(change).await,
                    Some(PropagatorMessage::Shutdown) | None => break,
                },
                _ = self.timer.fired(), if self.timer.is_armed() => {
                    let folded = self.folded();
                    debug!(%folded, "Debounce interval elapsed");
                    self.apply(folded).await;
                }
            }
        }

        self.timer.cancel();
        if self.state.pending().is_some() {
            let folded = self.folded();
            info!(%folded, "Flushing pending presence before shutdown");
            self.apply(folded).await;
        }
        info!("Status propagator stopped");
    }

    /// Worst classification across providers
    fn folded(&self) -> Classification {
        self.providers
            .values()
            .copied()
            .max()
            .unwrap_or(Classification::Normal)
    }

    async fn apply_baseline(&mut self) {
        let update = PresenceUpdate::for_classification(Classification::Normal, &self.config.labels);
        match self.client.set_presence(&update).await {
            Ok(()) => {
                self.applied_updates += 1;
                self.state.baseline_applied(Classification::Normal);
                self.publish(true);
            }
            Err(e) => {
                self.failed_updates += 1;
                warn!(client = self.client.name(), "Failed to apply baseline presence: {}", e);
                self.state.failed(Classification::Normal);
                self.publish(false);
            }
        }
    }

    async fn on_change(&mut self, change: StatusChange) {
        debug!(
            provider = %change.provider,
            old = %change.old,
            new = %change.new,
            "Received status change"
        );
        self.providers.insert(change.provider, change.new);

        let folded = self.folded();
        match self.state.observe(folded, Instant::now()) {
            Decision::Apply => self.apply(folded).await,
            Decision::Defer(deadline) => {
                if self.timer.arm(deadline) {
                    debug!(%folded, "Presence update deferred");
                }
                self.publish(false);
            }
            Decision::Skip => self.publish(false),
        }
    }

    async fn apply(&mut self, classification: Classification) {
        // Whatever the outcome, a deadline armed earlier must not fire a second call
        if self.timer.cancel() {
            debug!(%classification, "Debounce timer superseded");
        }
        let update = PresenceUpdate::for_classification(classification, &self.config.labels);
        match self.client.set_presence(&update).await {
            Ok(()) => {
                self.applied_updates += 1;
                self.state.applied(classification, Instant::now());
                info!(
                    client = self.client.name(),
                    state = %update.state,
                    label = %update.label,
                    "Applied presence"
                );
                self.publish(true);
            }
            Err(e) => {
                self.failed_updates += 1;
                self.state.failed(classification);
                warn!(
                    client = self.client.name(),
                    classification = %classification,
                    "Failed to apply presence: {}",
                    e
                );
                self.publish(false);
            }
        }
    }

    fn publish(&self, applied_now: bool) {
        let folded = self.folded();
        let last_applied = self.state.last_applied();
        let pending = self.state.pending();
        let providers = self.providers.clone();
        let (applied_updates, failed_updates) = (self.applied_updates, self.failed_updates);

        self.snapshot.send_modify(|snapshot| {
            snapshot.providers = providers;
            snapshot.folded = folded;
            snapshot.last_applied = last_applied;
            snapshot.pending = pending;
            snapshot.applied_updates = applied_updates;
            snapshot.failed_updates = failed_updates;
            if applied_now {
                snapshot.last_applied_at = Some(chrono::Utc::now());
            }
        });
    }
}
