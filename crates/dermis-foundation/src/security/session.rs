//! Per-session security state
//!
//! Bundles the CSRF token manager and the login limiter that an
//! authentication flow drives together, so both are created and reset in one
//! place instead of living as process globals.

use dermis_kernel::config::SecurityConfig;
use dermis_kernel::error::{SecurityError, SecurityResult};
use dermis_kernel::security::{Clock, SystemClock, TokenStore};
use std::sync::Arc;
use tracing::debug;

use super::csrf::CsrfTokenManager;
use super::rate_limiter::RateLimiter;

/// CSRF and throttling state for one signed-in session.
#[derive(Debug)]
pub struct SecuritySession {
    csrf: CsrfTokenManager,
    limiter: RateLimiter,
}

impl SecuritySession {
    pub fn new(csrf: CsrfTokenManager, limiter: RateLimiter) -> Self {
        Self { csrf, limiter }
    }

    /// Build from configuration on the system clock.
    pub fn from_config(config: &SecurityConfig, store: Arc<dyn TokenStore>) -> SecurityResult<Self> {
        Self::from_config_with_clock(config, store, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(
        config: &SecurityConfig,
        store: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> SecurityResult<Self> {
        Ok(Self {
            csrf: CsrfTokenManager::with_settings(store, &config.csrf)?,
            limiter: RateLimiter::from_config(&config.rate_limit, clock),
        })
    }

    pub fn csrf(&self) -> &CsrfTokenManager {
        &self.csrf
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Claim a login attempt.
    ///
    /// Records the attempt when one is available, otherwise returns
    /// [`SecurityError::RateLimited`] without recording.
    pub fn begin_login(&self) -> SecurityResult<()> {
        if !self.limiter.can_attempt() {
            let retry_after = self.limiter.time_until_reset();
            let retry_after_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX);
            debug!(retry_after_ms, "login throttled");
            return Err(SecurityError::RateLimited { retry_after });
        }
        self.limiter.record_attempt();
        Ok(())
    }

    /// A login, signup or refresh succeeded with `token`.
    pub fn login_succeeded(&self, token: &str) {
        self.csrf.set_token(token);
        self.limiter.reset();
    }

    pub fn logout(&self) {
        self.csrf.clear_token();
        self.limiter.reset();
    }
}
