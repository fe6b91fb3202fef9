//! Debounce bookkeeping for presence updates

use crate::core::rate_limiter::Classification;
use std::future::pending;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Sleep, sleep_until};

/// What the worker should do with a newly folded classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Call the presence client now
    Apply,
    /// Keep the value pending until the interval ends at the given instant
    Defer(Instant),
    /// Nothing to do
    Skip,
}

/// Last applied value, when it was applied, and what is waiting
#[derive(Debug, Clone)]
pub struct DebounceState {
    interval: Duration,
    last_applied: Option<Classification>,
    last_applied_at: Option<Instant>,
    pending: Option<Classification>,
}

impl DebounceState {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_applied: None,
            last_applied_at: None,
            pending: None,
        }
    }

    pub fn last_applied(&self) -> Option<Classification> {
        self.last_applied
    }

    pub fn last_applied_at(&self) -> Option<Instant> {
        self.last_applied_at
    }

    pub fn pending(&self) -> Option<Classification> {
        self.pending
    }

    /// End of the interval opened by the last applied update, if still running
    pub fn interval_end(&self, now: Instant) -> Option<Instant> {
        self.last_applied_at
            .map(|at| at + self.interval)
            .filter(|end| now < *end)
    }

    /// Decide how to handle `folded`, observed at `now`
    pub fn observe(&mut self, folded: Classification, now: Instant) -> Decision {
        let unchanged = self.pending.is_none() && self.last_applied == Some(folded);

        if let Some(end) = self.interval_end(now) {
            if unchanged {
                return Decision::Skip;
            }
            self.pending = Some(folded);
            return Decision::Defer(end);
        }

        if unchanged {
            Decision::Skip
        } else {
            Decision::Apply
        }
    }

    /// Record a successful update
    pub fn applied(&mut self, classification: Classification, now: Instant) {
        self.last_applied = Some(classification);
        self.last_applied_at = Some(now);
        self.pending = None;
    }

    /// Record the startup baseline; it does not open an interval
    pub fn baseline_applied(&mut self, classification: Classification) {
        self.last_applied = Some(classification);
        self.pending = None;
    }

    /// Record a failed update; the value stays pending for the next attempt
    pub fn failed(&mut self, classification: Classification) {
        self.pending = Some(classification);
    }
}

/// Cancellable one-shot timer polled from `tokio::select!`
#[derive(Debug, Default)]
pub struct DebounceTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `deadline`; an already armed timer keeps its deadline
    pub fn arm(&mut self, deadline: Instant) -> bool {
        if self.sleep.is_some() {
            return false;
        }
        self.sleep = Some(Box::pin(sleep_until(deadline)));
        true
    }

    /// Disarm; returns whether the timer was armed
    pub fn cancel(&mut self) -> bool {
        self.sleep.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|sleep| sleep.deadline())
    }

    /// Resolve when the armed deadline passes; never resolves while disarmed
    pub async fn fired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => pending::<()>().await,
        }
    }
}
