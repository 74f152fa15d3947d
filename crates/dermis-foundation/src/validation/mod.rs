//! Input validation for forms and credentials
//!
//! - **Named patterns**: email, password, name, phone, UUID, URL and friends,
//!   each with a fixed display message
//! - **Rule sets**: required / min / max length / regex / custom predicate,
//!   evaluated in that order with short-circuiting
//! - **Form schemas**: a rule or pattern per field, applied across a record
//!
//! Failures are returned as values for direct display; nothing here returns
//! `Err` for bad input.
//!
//! # Example
//!
//! ```rust
//! use dermis_foundation::validation::{validate_form, FormSchema, ValidationRules};
//! use dermis_kernel::security::NamedPattern;
//! use serde_json::json;
//!
//! let schema = FormSchema::new()
//!     .field("email", NamedPattern::Email)
//!     .field("name", ValidationRules::new().required().min_length(2));
//!
//! let data = json!({ "email": "bad", "name": "J" });
//! let result = validate_form(data.as_object().unwrap(), &schema);
//! assert!(!result.valid);
//! assert_eq!(result.errors.len(), 2);
//! ```

pub mod form;
pub mod patterns;
pub mod rules;

pub use form::{validate_form, validate_form_value, FieldSpec, FormSchema};
pub use patterns::{failure_message, matches, required_message, validate_input, validate_json};
pub use rules::{validate_with_rules, CustomRule, ValidationRules};
