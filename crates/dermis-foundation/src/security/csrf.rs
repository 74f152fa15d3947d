//! CSRF token management
//!
//! Keeps the session's anti-forgery token in a [`TokenStore`] and stamps it
//! onto outbound request headers. Storage problems are logged and swallowed:
//! a failed read behaves as "no token", a failed write or clear does nothing.

use dermis_kernel::config::CsrfSettings;
use dermis_kernel::error::{SecurityError, SecurityResult};
use dermis_kernel::security::{StoreError, StoreResult, TokenStore};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Storage key the token lives under.
pub const CSRF_STORAGE_KEY: &str = "csrf_token";

/// Request header that carries the token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

// =============================================================================
// Token Stores
// =============================================================================

/// In-memory store scoped to the current session. Nothing is persisted.
#[derive(Debug, Default)]
pub struct SessionTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl SessionTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for SessionTokenStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// A store whose every operation fails, as when session storage is blocked.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTokenStore;

impl TokenStore for UnavailableTokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("session storage is disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("session storage is disabled".into()))
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("session storage is disabled".into()))
    }
}

// =============================================================================
// Token Manager
// =============================================================================

/// Holds the CSRF token for one session.
#[derive(Clone)]
pub struct CsrfTokenManager {
    store: Arc<dyn TokenStore>,
    storage_key: String,
    header: HeaderName,
}

impl std::fmt::Debug for CsrfTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokenManager")
            .field("storage_key", &self.storage_key)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl CsrfTokenManager {
    /// Manager using the default key and header.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            storage_key: CSRF_STORAGE_KEY.to_string(),
            header: HeaderName::from_static("x-csrf-token"),
        }
    }

    /// Manager using the key and header from configuration.
    pub fn with_settings(store: Arc<dyn TokenStore>, settings: &CsrfSettings) -> SecurityResult<Self> {
        let header = HeaderName::try_from(settings.header_name.as_str()).map_err(|e| {
            SecurityError::InvalidSetting {
                name: "csrf.header_name".into(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            store,
            storage_key: settings.storage_key.clone(),
            header,
        })
    }

    /// The header name the token is sent under.
    #[must_use]
    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    /// Store `token`, replacing any previous one.
    pub fn set_token(&self, token: &str) {
        if let Err(error) = self.store.set(&self.storage_key, token) {
            warn!(key = %self.storage_key, %error, "failed to store CSRF token");
        }
    }

    /// The stored token, if any.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        match self.store.get(&self.storage_key) {
            Ok(token) => token,
            Err(error) => {
                warn!(key = %self.storage_key, %error, "failed to read CSRF token");
                None
            }
        }
    }

    /// Forget the stored token.
    pub fn clear_token(&self) {
        if let Err(error) = self.store.remove(&self.storage_key) {
            warn!(key = %self.storage_key, %error, "failed to clear CSRF token");
        }
    }

    /// Build headers for a state-changing request.
    ///
    /// Starts from `Content-Type: application/json`, then applies `extra`
    /// (entries in `extra` replace defaults of the same name), then adds the
    /// CSRF header when a token is stored.
    #[must_use]
    pub fn create_secure_headers(&self, extra: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(extra.len() + 2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for name in extra.keys() {
            headers.remove(name);
        }
        for (name, value) in extra {
            headers.append(name.clone(), value.clone());
        }

        if let Some(token) = self.get_token() {
            match HeaderValue::from_str(&token) {
                Ok(value) => {
                    headers.insert(self.header.clone(), value);
                }
                Err(_) => warn!(
                    header = %self.header,
                    "stored CSRF token is not a valid header value"
                ),
            }
        }

        headers
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;

    fn manager() -> CsrfTokenManager {
        CsrfTokenManager::new(Arc::new(SessionTokenStore::new()))
    }

    #[test]
    fn set_get_clear() {
        let csrf = manager();
        assert_eq!(csrf.get_token(), None);

        csrf.set_token("abc123");
        assert_eq!(csrf.get_token().as_deref(), Some("abc123"));

        csrf.set_token("def456");
        assert_eq!(csrf.get_token().as_deref(), Some("def456"));

        csrf.clear_token();
        assert_eq!(csrf.get_token(), None);
    }

    #[test]
    fn headers_include_token_when_stored() {
        let csrf = manager();
        csrf.set_token("abc123");

        let headers = csrf.create_secure_headers(&HeaderMap::new());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[CSRF_HEADER], "abc123");
    }

    #[test]
    fn headers_omit_token_when_absent() {
        let headers = manager().create_secure_headers(&HeaderMap::new());
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.get(CSRF_HEADER).is_none());
    }

    #[test]
    fn caller_headers_override_defaults() {
        let csrf = manager();
        let mut extra = HeaderMap::new();
        extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let headers = csrf.create_secure_headers(&extra);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn unavailable_store_is_silent() {
        let csrf = CsrfTokenManager::new(Arc::new(UnavailableTokenStore));
        csrf.set_token("abc123");
        assert_eq!(csrf.get_token(), None);
        csrf.clear_token();

        let headers = csrf.create_secure_headers(&HeaderMap::new());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn managers_sharing_a_store_see_the_same_token() {
        let store: Arc<dyn TokenStore> = Arc::new(SessionTokenStore::new());
        let a = CsrfTokenManager::new(Arc::clone(&store));
        let b = CsrfTokenManager::new(store);

        a.set_token("shared");
        assert_eq!(b.get_token().as_deref(), Some("shared"));
    }

    #[test]
    fn custom_settings() {
        let settings = CsrfSettings {
            storage_key: "xsrf".into(),
            header_name: "X-XSRF-Token".into(),
        };
        let store = Arc::new(SessionTokenStore::new());
        let csrf = CsrfTokenManager::with_settings(store.clone(), &settings).unwrap();
        csrf.set_token("t");

        assert_eq!(store.get("xsrf").unwrap().as_deref(), Some("t"));
        assert_eq!(store.get(CSRF_STORAGE_KEY).unwrap(), None);
        let headers = csrf.create_secure_headers(&HeaderMap::new());
        assert_eq!(headers["x-xsrf-token"], "t");
    }

    #[test]
    fn invalid_header_setting_is_rejected() {
        let settings = CsrfSettings {
            header_name: "bad header".into(),
            ..CsrfSettings::default()
        };
        let err = CsrfTokenManager::with_settings(Arc::new(SessionTokenStore::new()), &settings)
            .unwrap_err();
        assert!(matches!(err, SecurityError::InvalidSetting { .. }));
    }
}
