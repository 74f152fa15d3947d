//! Dermis Testing Utilities
//!
//! Test doubles and fixtures for exercising the security toolkit without a
//! browser session or a live backend.

pub mod fixtures;
pub mod rules;
pub mod store;

pub use fixtures::{credentials_schema, init_test_tracing, signup_form};
pub use rules::CallCounter;
pub use store::FlakyTokenStore;
