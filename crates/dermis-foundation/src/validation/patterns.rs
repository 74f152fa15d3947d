//! Named pattern validation
//!
//! Maps every [`NamedPattern`] to a compiled matcher and a display message,
//! and validates single values against them.

use dermis_kernel::security::{NamedPattern, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

// =============================================================================
// Compiled Patterns
// =============================================================================

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

// Lookaheads need a backtracking engine
static PASSWORD_RE: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(
        r"^(?=.*[a-z])(?=.*[A-Z])(?=.*[0-9])(?=.*[@$!%*?&])[A-Za-z0-9@$!%*?&]{8,}$",
    )
    .unwrap()
});

// Any character except line terminators
static PASSWORD_SIMPLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\n\r\x{2028}\x{2029}]{8,}$").unwrap());

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]{2,100}$").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{10,20}$").unwrap());

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\n\r\x{2028}\x{2029}][^\s]*$").unwrap());

static ALPHANUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

// =============================================================================
// Pattern Table
// =============================================================================

enum Matcher {
    Plain(&'static Lazy<Regex>),
    Backtracking(&'static Lazy<fancy_regex::Regex>),
}

impl Matcher {
    fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Plain(re) => re.is_match(value),
            // A backtrack-limit error counts as a mismatch
            Self::Backtracking(re) => re.is_match(value).unwrap_or(false),
        }
    }
}

struct PatternSpec {
    matcher: Matcher,
    message: Option<&'static str>,
}

fn spec(pattern: NamedPattern) -> PatternSpec {
    let (matcher, message) = match pattern {
        NamedPattern::Email => (
            Matcher::Plain(&EMAIL_RE),
            Some("Please enter a valid email address"),
        ),
        NamedPattern::Password => (
            Matcher::Backtracking(&PASSWORD_RE),
            Some(
                "Password must be at least 8 characters with uppercase, lowercase, number, and special character (@$!%*?&)",
            ),
        ),
        NamedPattern::PasswordSimple => (
            Matcher::Plain(&PASSWORD_SIMPLE_RE),
            Some("Password must be at least 8 characters"),
        ),
        NamedPattern::Name => (
            Matcher::Plain(&NAME_RE),
            Some(
                "Name must be 2-100 characters and contain only letters, spaces, hyphens, and apostrophes",
            ),
        ),
        NamedPattern::Phone => (
            Matcher::Plain(&PHONE_RE),
            Some("Please enter a valid phone number"),
        ),
        NamedPattern::Uuid => (Matcher::Plain(&UUID_RE), Some("Invalid ID format")),
        NamedPattern::Url => (Matcher::Plain(&URL_RE), Some("Please enter a valid URL")),
        NamedPattern::Alphanumeric => (Matcher::Plain(&ALPHANUMERIC_RE), None),
        NamedPattern::Numeric => (Matcher::Plain(&NUMERIC_RE), None),
    };

    PatternSpec { matcher, message }
}

/// Test an already-trimmed value against a named pattern.
#[must_use]
pub fn matches(pattern: NamedPattern, value: &str) -> bool {
    spec(pattern).matcher.is_match(value)
}

/// The message shown when a value does not match `pattern`.
#[must_use]
pub fn failure_message(pattern: NamedPattern) -> String {
    match spec(pattern).message {
        Some(message) => message.to_string(),
        None => format!("Invalid {pattern} format"),
    }
}

/// The message shown when a value for `pattern` is missing.
#[must_use]
pub fn required_message(pattern: NamedPattern) -> String {
    format!("{pattern} is required")
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a possibly-absent string against a named pattern.
///
/// Absent and empty values fail with `"<name> is required"`. Anything else is
/// trimmed before matching.
///
/// # Example
///
/// ```rust
/// use dermis_foundation::validation::validate_input;
/// use dermis_kernel::security::NamedPattern;
///
/// assert!(validate_input(Some(" user@example.com "), NamedPattern::Email).valid);
/// assert_eq!(
///     validate_input(None, NamedPattern::Email).error.as_deref(),
///     Some("email is required")
/// );
/// ```
pub fn validate_input(value: Option<&str>, pattern: NamedPattern) -> ValidationResult {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return ValidationResult::invalid(required_message(pattern));
    };

    if matches(pattern, value.trim()) {
        ValidationResult::ok()
    } else {
        trace!(pattern = %pattern, "value rejected by named pattern");
        ValidationResult::invalid(failure_message(pattern))
    }
}

/// Validate a dynamically typed value against a named pattern.
///
/// Missing, `null` and non-string values are treated as absent.
pub fn validate_json(value: Option<&Value>, pattern: NamedPattern) -> ValidationResult {
    match value {
        Some(Value::String(s)) => validate_input(Some(s), pattern),
        _ => validate_input(None, pattern),
    }
}

// =============================================================================
// Tests
// =============================================================================
