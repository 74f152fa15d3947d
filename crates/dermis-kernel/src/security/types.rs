//! Security toolkit core types
//!
//! Defines the value types shared by the validators, the sanitizer and the
//! password scorer. Results are plain data: validation failures are encoded
//! here rather than raised as errors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SecurityError;

// =============================================================================
// Named Patterns
// =============================================================================

/// The fixed set of named input patterns.
///
/// The matcher and message for each variant live in
/// `dermis-foundation::validation::patterns`; this enum is the identifier
/// callers and configuration files use to pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedPattern {
    /// `local@domain.tld`
    #[serde(rename = "email")]
    Email,
    /// Strong password: mixed case, digit and one of `@$!%*?&`
    #[serde(rename = "password")]
    Password,
    /// Any 8+ characters
    #[serde(rename = "passwordSimple")]
    PasswordSimple,
    /// Person name, 2-100 letters, spaces, hyphens or apostrophes
    #[serde(rename = "name")]
    Name,
    /// Phone number, optional leading `+`
    #[serde(rename = "phone")]
    Phone,
    /// Canonical hyphenated UUID
    #[serde(rename = "uuid")]
    Uuid,
    /// `http://` or `https://` URL
    #[serde(rename = "url")]
    Url,
    /// Letters and digits
    #[serde(rename = "alphanumeric")]
    Alphanumeric,
    /// Digits
    #[serde(rename = "numeric")]
    Numeric,
}

impl NamedPattern {
    /// Every named pattern, in declaration order.
    pub const ALL: [NamedPattern; 9] = [
        Self::Email,
        Self::Password,
        Self::PasswordSimple,
        Self::Name,
        Self::Phone,
        Self::Uuid,
        Self::Url,
        Self::Alphanumeric,
        Self::Numeric,
    ];

    /// The short name used in messages and configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordSimple => "passwordSimple",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Uuid => "uuid",
            Self::Url => "url",
            Self::Alphanumeric => "alphanumeric",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for NamedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedPattern {
    type Err = SecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pattern| pattern.name() == s)
            .ok_or_else(|| SecurityError::UnknownPattern(s.to_string()))
    }
}

// =============================================================================
// Validation Results
// =============================================================================

/// Outcome of validating a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the value passed
    pub valid: bool,
    /// Human-readable message when `valid` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// A failing result carrying a display message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }

    /// Returns `true` if the value passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Outcome of validating a whole record against a form schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValidationResult {
    /// `true` iff `errors` is empty
    pub valid: bool,
    /// Field name -> message, failing fields only
    pub errors: HashMap<String, String>,
}

impl FormValidationResult {
    /// Build a result from the collected field errors.
    #[must_use]
    pub fn from_errors(errors: HashMap<String, String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Returns `true` if every schema field passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The message recorded for `field`, if it failed.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Number of failing fields.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

// =============================================================================
// Password Strength
// =============================================================================

/// Label attached to a password strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthLabel {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    #[serde(rename = "Weak")]
    Weak,
    #[serde(rename = "Fair")]
    Fair,
    #[serde(rename = "Strong")]
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl StrengthLabel {
    /// Labels indexed by score.
    pub const BY_SCORE: [StrengthLabel; 5] = [
        Self::VeryWeak,
        Self::Weak,
        Self::Fair,
        Self::Strong,
        Self::VeryStrong,
    ];

    /// Label for a score, saturating above 4.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        Self::BY_SCORE[usize::from(score.min(4))]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// 0..=4
    pub score: u8,
    pub label: StrengthLabel,
    /// Up to three improvement hints, in the order they were produced
    pub suggestions: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
