//! Sliding window call accounting
//!
//! Each provider owns one [`SlidingWindowCounter`], which keeps an independent
//! timestamp sequence per configured window. Expired entries are dropped from
//! the front of a sequence whenever it is counted, so memory stays bounded by
//! the number of calls inside the longest window.

use super::types::WindowUsage;
use crate::utils::error::{Result, SentinelError};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Validated window length and call limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimit {
    window: Duration,
    limit: u32,
}

impl WindowLimit {
    /// Create a window limit; zero windows and zero limits are rejected
    pub fn new(window: Duration, limit: u32) -> Result<Self> {
        if window.is_zero() {
            return Err(SentinelError::config("Window duration must be greater than 0"));
        }
        if limit == 0 {
            return Err(SentinelError::config(format!(
                "Limit for {:?} window must be greater than 0",
                window
            )));
        }
        Ok(Self { window, limit })
    }

    /// Calls per minute
    pub fn per_minute(limit: u32) -> Result<Self> {
        Self::new(Duration::from_secs(60), limit)
    }

    /// Calls per day
    pub fn per_day(limit: u32) -> Result<Self> {
        Self::new(Duration::from_secs(86_400), limit)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// Timestamps of one (provider, window) pair, oldest first
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    limit: WindowLimit,
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new(limit: WindowLimit) -> Self {
        Self {
            limit,
            timestamps: VecDeque::new(),
        }
    }

    pub fn limit(&self) -> WindowLimit {
        self.limit
    }

    /// Record one call at `now`
    pub fn record(&mut self, now: Instant) {
        match self.timestamps.back() {
            Some(&last) if now < last => {
                // Keep the sequence ordered when callers pass an older instant
                let index = self.timestamps.partition_point(|&t| t <= now);
                self.timestamps.insert(index, now);
            }
            _ => self.timestamps.push_back(now),
        }
    }

    /// Drop calls that fell out of the window, then count the rest
    pub fn count(&mut self, now: Instant) -> u32 {
        self.evict(now);
        self.timestamps.len() as u32
    }

    /// Count and describe the window at `now`
    pub fn usage(&mut self, now: Instant) -> WindowUsage {
        let count = self.count(now);
        WindowUsage {
            window_secs: self.limit.window.as_secs_f64(),
            count,
            limit: self.limit.limit,
            ratio: count as f64 / self.limit.limit as f64,
        }
    }

    fn evict(&mut self, now: Instant) {
        // Nothing can be older than the window this early in the clock
        let Some(window_start) = now.checked_sub(self.limit.window) else {
            return;
        };
        while let Some(&oldest) = self.timestamps.front() {
            if oldest >= window_start {
                break;
            }
            self.timestamps.pop_front();
        }
    }
}

/// All windows of one provider
#[derive(Debug, Clone)]
pub struct SlidingWindowCounter {
    provider: String,
    windows: Vec<SlidingWindow>,
}

impl SlidingWindowCounter {
    pub fn new(provider: impl Into<String>, limits: &[WindowLimit]) -> Self {
        Self {
            provider: provider.into(),
            windows: limits.iter().copied().map(SlidingWindow::new).collect(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Record a call in a single window; returns false if the window is not configured
    pub fn register_call(&mut self, window: Duration, now: Instant) -> bool {
        match self.window_mut(window) {
            Some(w) => {
                w.record(now);
                true
            }
            None => false,
        }
    }

    /// Record a call in every window
    pub fn record(&mut self, now: Instant) {
        for window in &mut self.windows {
            window.record(now);
        }
    }

    /// Calls inside `window` at `now`; unknown windows count as 0
    pub fn count(&mut self, window: Duration, now: Instant) -> u32 {
        self.window_mut(window).map_or(0, |w| w.count(now))
    }

    /// Usage of every window at `now`
    pub fn usages(&mut self, now: Instant) -> Vec<WindowUsage> {
        self.windows.iter_mut().map(|w| w.usage(now)).collect()
    }

    /// Swap in new limits, carrying over timestamps of windows whose length is unchanged
    pub fn reconfigure(&mut self, limits: &[WindowLimit]) {
        let mut previous = std::mem::take(&mut self.windows);
        self.windows = limits
            .iter()
            .map(|limit| {
                match previous
                    .iter()
                    .position(|w| w.limit.window == limit.window)
                {
                    Some(index) => {
                        let mut carried = previous.swap_remove(index);
                        carried.limit = *limit;
                        carried
                    }
                    None => SlidingWindow::new(*limit),
                }
            })
            .collect();
    }

    fn window_mut(&mut self, window: Duration) -> Option<&mut SlidingWindow> {
        self.windows.iter_mut().find(|w| w.limit.window == window)
    }
}
