//! Dermis Kernel
//!
//! Contracts and shared types for the Dermis client security toolkit:
//! validation results, named pattern identifiers, the session token store
//! capability, the throttling clock and configuration loading. Concrete
//! validators, the sanitizer, the CSRF manager and the rate limiter live in
//! `dermis-foundation`.

// error module
pub mod error;

// security contracts
pub mod security;

// configuration loader
#[cfg(feature = "config")]
pub mod config;

pub use error::{SecurityError, SecurityResult};
pub use security::*;
