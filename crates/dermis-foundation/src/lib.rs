//! Dermis Foundation
//!
//! Implementations behind the `dermis-kernel` contracts: the named pattern,
//! rule and form validators, the sanitizer, the CSRF token manager and secure
//! fetch helper, the sliding-window rate limiter and the password scorer.

// validation module - named patterns, rule sets, form schemas
pub mod validation;

// security module - sanitizer, csrf, throttling, password strength
pub mod security;

pub use security::{
    check_password_strength, generate_secure_token, sanitize_html, sanitize_input,
    sanitize_object, CsrfTokenManager, FetchOptions, RateLimiter, SecureFetch, SecuritySession,
    SessionTokenStore, UnavailableTokenStore,
};
pub use validation::{
    validate_form, validate_input, validate_with_rules, FieldSpec, FormSchema, ValidationRules,
};
