//! Security primitives for the client layer
//!
//! - [`sanitizer`]: strip script content and entity-encode text and JSON
//! - [`csrf`] / [`fetch`]: hold the CSRF token and attach it to requests
//! - [`rate_limiter`]: sliding-window attempt throttling
//! - [`password`]: 0-4 strength score with suggestions
//! - [`session`]: the CSRF manager and login limiter of one session
//!
//! These checks shape user experience and reduce accidental exposure. The
//! server remains the enforcement point.

pub mod csrf;
pub mod fetch;
pub mod password;
pub mod rate_limiter;
pub mod sanitizer;
pub mod session;
pub mod token;

pub use csrf::{
    CsrfTokenManager, SessionTokenStore, UnavailableTokenStore, CSRF_HEADER, CSRF_STORAGE_KEY,
};
pub use fetch::{FetchOptions, SecureFetch};
pub use password::check_password_strength;
pub use rate_limiter::RateLimiter;
pub use sanitizer::{
    contains_dangerous_content, escape_html, sanitize_html, sanitize_input, sanitize_object,
};
pub use session::SecuritySession;
pub use token::generate_secure_token;
