//! Crate-level error types for `dermis-kernel`.
//!
//! Validation failures are never errors: they travel as
//! [`ValidationResult`](crate::security::ValidationResult) values. The
//! [`SecurityError`] enum covers the remaining cases that callers have to
//! branch on: misconfiguration, throttling and transport failures.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the security toolkit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecurityError {
    /// A pattern name that is not one of the named patterns
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    /// A rule set in configuration carries a regex that does not compile
    #[error("Invalid pattern for field '{field}': {message}")]
    InvalidRulePattern {
        /// Schema field the rule belongs to
        field: String,
        /// Compiler message
        message: String,
    },

    /// The caller exhausted its attempts for the current window
    #[error("Too many attempts, retry in {}s", retry_after.as_secs())]
    RateLimited {
        /// Time until the oldest attempt leaves the window
        retry_after: Duration,
    },

    /// A setting value that cannot be used as given
    #[error("Invalid setting '{name}': {message}")]
    InvalidSetting {
        /// Setting key
        name: String,
        /// What is wrong with it
        message: String,
    },

    /// The outbound request could not be built or sent
    #[error("Request failed: {0}")]
    Request(String),

    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
