//! Service wiring and the `run_service` entry point

use crate::config::Config;
use crate::core::presence::{PresenceClient, PropagatorConfig, StatusPropagator, client_from_config};
use crate::core::rate_limiter::{CallbackId, RateLimitMonitor};
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::{Result, SentinelError};
use crate::utils::logging::{bootstrap_dispatch, init_logging};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{info, warn};

/// Builder for a running [`Service`]
#[derive(Default)]
pub struct ServiceBuilder {
    config: Option<Config>,
    client: Option<Arc<dyn PresenceClient>>,
}

impl ServiceBuilder {
    /// Create a new service builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use `client` instead of the one selected by the presence config
    pub fn with_presence_client(mut self, client: Arc<dyn PresenceClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the monitor, start the propagator and the sweep task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Service> {
        let config = self
            .config
            .ok_or_else(|| SentinelError::config("Configuration is required"))?;

        let client = match self.client {
            Some(client) => client,
            None => client_from_config(config.presence())?,
        };

        let monitor = Arc::new(RateLimitMonitor::from_configs(config.providers()));
        let propagator = Arc::new(StatusPropagator::start(
            client,
            PropagatorConfig::from(config.presence()),
        ));
        let subscription = propagator.attach(&monitor);
        let sweep = Arc::clone(&monitor)
            .start_sweep_task(Duration::from_secs(config.presence().sweep_interval_secs));

        info!(
            providers = monitor.providers().len(),
            "Quota sentinel started"
        );

        Ok(Service {
            config,
            monitor,
            propagator,
            subscription,
            sweep,
        })
    }
}

/// Running monitor, propagator and sweep task
pub struct Service {
    config: Config,
    monitor: Arc<RateLimitMonitor>,
    propagator: Arc<StatusPropagator>,
    subscription: CallbackId,
    sweep: JoinHandle<()>,
}

impl Service {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn monitor(&self) -> &Arc<RateLimitMonitor> {
        &self.monitor
    }

    pub fn propagator(&self) -> &Arc<StatusPropagator> {
        &self.propagator
    }

    /// State handed to HTTP handlers
    pub fn state(&self) -> AppState {
        AppState::new(Arc::clone(&self.monitor), Arc::clone(&self.propagator))
    }

    /// Apply the provider sections of `config`.
    ///
    /// Server, presence and logging changes only take effect after a restart.
    pub fn reload(&self, config: &Config) -> usize {
        if config.server != self.config.server
            || config.presence != self.config.presence
            || config.logging != self.config.logging
        {
            warn!("Only provider limits are reloaded; restart to apply other changes");
        }
        self.monitor.reload(config.providers())
    }

    /// Stop the sweep, detach from the monitor and flush the propagator
    pub async fn shutdown(&self) -> Result<()> {
        self.sweep.abort();
        self.monitor.unregister_status_callback(self.subscription);
        self.propagator.shutdown().await?;
        info!("Quota sentinel stopped");
        Ok(())
    }
}

/// Load configuration, then run the HTTP surface until Ctrl-C
pub async fn run_service(config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref())
        .with_subscriber(bootstrap_dispatch())
        .await?;
    if let Err(e) = init_logging(config.logging()) {
        warn!("{}", e);
    }

    let service = Arc::new(ServiceBuilder::new().with_config(config.clone()).build()?);
    let reloader = spawn_reload_listener(Arc::clone(&service), config_path);

    info!("API Endpoints:");
    info!("   GET  /health");
    info!("   POST /v1/providers/{{provider}}/calls");
    info!("   GET  /v1/providers/{{provider}}/status");
    info!("   GET  /v1/providers");
    info!("   GET  /v1/presence");

    let served = HttpServer::new(config.server().clone(), service.state())
        .start()
        .await;

    if let Some(reloader) = reloader {
        reloader.abort();
    }
    service.shutdown().await?;

    served
}

/// Re-read the config file and reload provider limits on every `SIGHUP`
#[cfg(unix)]
fn spawn_reload_listener(service: Arc<Service>, path: Option<PathBuf>) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            warn!("Failed to listen for SIGHUP, reloading disabled: {}", e);
            return None;
        }
    };

    Some(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading configuration");
            match Config::load(path.as_deref()).await {
                Ok(config) => {
                    let tracked = service.reload(&config);
                    info!(providers = tracked, "Provider limits reloaded");
                }
                Err(e) => warn!("Keeping current configuration: {}", e),
            }
        }
    }))
}

#[cfg(not(unix))]
fn spawn_reload_listener(_service: Arc<Service>, _path: Option<PathBuf>) -> Option<JoinHandle<()>> {
    None
}
