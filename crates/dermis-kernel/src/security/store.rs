//! Session token storage contract
//!
//! A `TokenStore` is the per-browser-session key/value slot the CSRF manager
//! keeps its token in. Storage may be unavailable (for example when private
//! browsing blocks it), so every operation returns a `StoreResult` and the
//! unavailable branch is an ordinary, testable value.

use thiserror::Error;

/// Errors from a token store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The storage area cannot be used at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for token store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Short-lived string storage scoped to one session.
///
/// Values are not expected to survive a restart. Implementations must be
/// cheap and synchronous; callers treat the store as a best-effort cache.
pub trait TokenStore: Send + Sync {
    /// Read the value under `key`. `Ok(None)` when nothing is stored.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
