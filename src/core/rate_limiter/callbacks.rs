//! Status change callback registry
//!
//! Listeners are invoked synchronously, one at a time, each behind its own
//! `catch_unwind` boundary. A failing listener is logged and skipped; it never
//! affects the other listeners or the code that triggered the evaluation.

use super::types::StatusChange;
use crate::utils::error::{Result, SentinelError};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, warn};

/// Listener invoked with every classification transition
pub type StatusCallback = Arc<dyn Fn(&StatusChange) -> Result<()> + Send + Sync>;

/// Wrap a closure as a [`StatusCallback`]
pub fn status_callback<F>(callback: F) -> StatusCallback
where
    F: Fn(&StatusChange) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Ordered list of status listeners
pub struct CallbackRegistry {
    next_id: AtomicU64,
    callbacks: RwLock<Vec<(CallbackId, StatusCallback)>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Add a listener; listeners run in registration order
    pub fn register(&self, callback: StatusCallback) -> CallbackId {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.write().push((id, callback));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unregister(&self, id: CallbackId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }

    /// Invoke every listener with `change`, returning how many failed
    pub fn notify(&self, change: &StatusChange) -> usize {
        // Snapshot so listeners may register or unregister without deadlocking
        let snapshot: Vec<StatusCallback> = self
            .callbacks
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        let mut failures = 0;
        for callback in snapshot {
            match catch_unwind(AssertUnwindSafe(|| callback(change))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    warn!(
                        provider = %change.provider,
                        old = %change.old,
                        new = %change.new,
                        "Status listener failed: {}",
                        e
                    );
                }
                Err(payload) => {
                    failures += 1;
                    let e = SentinelError::listener(
                        change.provider.clone(),
                        change.old,
                        change.new,
                        format!("panicked: {}", panic_message(payload.as_ref())),
                    );
                    error!(provider = %change.provider, "{}", e);
                }
            }
        }
        failures
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
