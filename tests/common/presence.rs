//! Presence client doubles

use parking_lot::Mutex;
use quota_sentinel::core::presence::{PresenceClient, PresenceState, PresenceUpdate};
use quota_sentinel::{Result, SentinelError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Records successful updates; can be switched into a failing mode
#[derive(Debug, Default)]
pub struct RecordingPresenceClient {
    updates: Mutex<Vec<PresenceUpdate>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingPresenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<PresenceState> {
        self.updates.lock().iter().map(|u| u.state).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.updates.lock().iter().map(|u| u.label.clone()).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PresenceClient for RecordingPresenceClient {
    async fn set_presence(&self, update: &PresenceUpdate) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SentinelError::presence("presence surface unavailable"));
        }
        self.updates.lock().push(update.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
