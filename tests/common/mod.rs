//! Common test utilities for quota-sentinel

pub mod fixtures;
pub mod presence;

pub use fixtures::{provider, service_config};
pub use presence::RecordingPresenceClient;

use std::time::Duration;

/// Let spawned tasks run without moving the paused clock
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock, then let tasks react
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}
