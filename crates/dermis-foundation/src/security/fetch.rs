//! Outbound requests carrying the CSRF token
//!
//! [`SecureFetch`] wraps a cookie-enabled `reqwest` client and builds every
//! request with the headers from [`CsrfTokenManager::create_secure_headers`].

use dermis_kernel::error::{SecurityError, SecurityResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;

use super::csrf::CsrfTokenManager;

/// Per-request options.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// HTTP method, `GET` by default
    pub method: Method,
    /// Extra headers; these replace the defaults of the same name
    pub headers: HeaderMap,
    /// Request body, sent as-is
    pub body: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> SecurityResult<Self> {
        let body = serde_json::to_string(value)
            .map_err(|e| SecurityError::Request(format!("failed to encode body: {e}")))?;
        Ok(self.body(body))
    }
}

/// HTTP helper that always sends cookies and the CSRF header.
#[derive(Debug, Clone)]
pub struct SecureFetch {
    client: Client,
    csrf: CsrfTokenManager,
}

impl SecureFetch {
    /// Build with a fresh client that keeps a cookie jar.
    pub fn new(csrf: CsrfTokenManager) -> SecurityResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| SecurityError::Request(e.to_string()))?;
        Ok(Self { client, csrf })
    }

    /// Build around an existing client.
    pub fn with_client(client: Client, csrf: CsrfTokenManager) -> Self {
        Self { client, csrf }
    }

    pub fn csrf(&self) -> &CsrfTokenManager {
        &self.csrf
    }

    /// Prepare a request without sending it.
    pub fn request(&self, url: &str, options: &FetchOptions) -> RequestBuilder {
        let headers = self.csrf.create_secure_headers(&options.headers);
        let builder = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);

        match &options.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        }
    }

    /// Send a request and return the raw response.
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> SecurityResult<Response> {
        debug!(method = %options.method, "sending secure request");
        self.request(url, &options)
            .send()
            .await
            .map_err(|e| SecurityError::Request(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
