//! Rule-based validation
//!
//! Validates a single value against a caller-supplied rule set, independent
//! of the named pattern table. Checks run in a fixed order and stop at the
//! first failure: required, min length, max length, pattern, custom.

use dermis_kernel::config::RuleSpec;
use dermis_kernel::error::{SecurityError, SecurityResult};
use dermis_kernel::security::ValidationResult;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Caller-supplied predicate. Receives the trimmed value; its result is
/// returned verbatim when it is reached.
#[derive(Clone)]
pub struct CustomRule(Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>);

impl CustomRule {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn call(&self, value: &str) -> ValidationResult {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// Declarative constraints for one field.
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub custom: Option<CustomRule>,
}

impl ValidationRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    #[must_use]
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        self.custom = Some(CustomRule::new(f));
        self
    }

    /// Build rules from their configuration form.
    ///
    /// `field` only labels the error when the regex does not compile.
    pub fn from_spec(field: &str, spec: &RuleSpec) -> SecurityResult<Self> {
        let pattern = spec
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| SecurityError::InvalidRulePattern {
                field: field.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            required: spec.required,
            min_length: spec.min_length,
            max_length: spec.max_length,
            pattern,
            custom: None,
        })
    }
}

/// Validate a possibly-absent value against a rule set.
///
/// Blank values fail only when `required`; otherwise they pass without any
/// other rule being evaluated. Lengths count Unicode scalar values of the
/// trimmed value.
pub fn validate_with_rules(value: Option<&str>, rules: &ValidationRules) -> ValidationResult {
    let trimmed = value.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        if rules.required {
            return ValidationResult::invalid("This field is required");
        }
        return ValidationResult::ok();
    }

    let length = trimmed.chars().count();

    if let Some(min) = rules.min_length {
        if length < min {
            trace!(min, "value shorter than min_length");
            return ValidationResult::invalid(format!("Must be at least {min} characters"));
        }
    }

    if let Some(max) = rules.max_length {
        if length > max {
            trace!(max, "value longer than max_length");
            return ValidationResult::invalid(format!("Must be no more than {max} characters"));
        }
    }

    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(trimmed) {
            return ValidationResult::invalid("Invalid format");
        }
    }

    match &rules.custom {
        Some(custom) => custom.call(trimmed),
        None => ValidationResult::ok(),
    }
}

// =============================================================================
// Tests
// =============================================================================
