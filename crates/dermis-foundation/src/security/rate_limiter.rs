//! Sliding-window attempt limiting
//!
//! Counts attempts inside a trailing window of fixed length. Attempts older
//! than the window are pruned lazily when the limiter is queried.

use dermis_kernel::config::RateLimitSettings;
use dermis_kernel::security::{Clock, SystemClock};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default attempts allowed per window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Sliding-window rate limiter.
///
/// Methods take `&self`, so one limiter can be shared behind an `Arc`.
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    /// Attempt times, oldest first
    attempts: Mutex<VecDeque<Instant>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_attempts", &self.max_attempts)
            .field("window", &self.window)
            .field("recorded", &self.attempts.lock().len())
            .finish_non_exhaustive()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    /// Create a limiter on the system clock.
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self::with_clock(max_attempts, window, Arc::new(SystemClock))
    }

    /// Create a limiter reading time from `clock`.
    pub fn with_clock(max_attempts: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_attempts,
            window,
            clock,
            attempts: Mutex::new(VecDeque::new()),
        }
    }

    /// Create a limiter from configuration.
    pub fn from_config(settings: &RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock(
            settings.max_attempts,
            Duration::from_millis(settings.window_ms),
            clock,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&self, attempts: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = attempts.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            attempts.pop_front();
        }
    }

    fn live_count(&self) -> usize {
        let now = self.clock.now();
        let mut attempts = self.attempts.lock();
        self.prune(&mut attempts, now);
        attempts.len()
    }

    /// Whether another attempt fits in the current window.
    pub fn can_attempt(&self) -> bool {
        let count = self.live_count();
        let allowed = count < self.max_attempts as usize;
        debug!(
            recorded = count,
            max_attempts = self.max_attempts,
            allowed,
            "rate limit check"
        );
        allowed
    }

    /// Record an attempt now. Recording is not gated on [`can_attempt`](Self::can_attempt).
    pub fn record_attempt(&self) {
        let now = self.clock.now();
        self.attempts.lock().push_back(now);
    }

    /// Attempts left in the current window.
    pub fn remaining_attempts(&self) -> u32 {
        let count = u32::try_from(self.live_count()).unwrap_or(u32::MAX);
        let remaining = self.max_attempts.saturating_sub(count);
        debug!(remaining, max_attempts = self.max_attempts, "remaining attempts");
        remaining
    }

    /// Time until the oldest recorded attempt leaves the window.
    ///
    /// Zero when nothing is recorded. This does not prune.
    pub fn time_until_reset(&self) -> Duration {
        let now = self.clock.now();
        match self.attempts.lock().front() {
            Some(&oldest) => self
                .window
                .saturating_sub(now.saturating_duration_since(oldest)),
            None => Duration::ZERO,
        }
    }

    /// Forget every recorded attempt.
    pub fn reset(&self) {
        self.attempts.lock().clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
