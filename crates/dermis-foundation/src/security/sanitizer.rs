//! Input sanitization against markup injection
//!
//! Removes script blocks, inline event handlers and script-bearing URL
//! schemes, then entity-encodes what is left. Encoding is applied on every
//! call, so sanitizing already-encoded text encodes its ampersands again.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

// =============================================================================
// Compiled Patterns
// =============================================================================

// Non-greedy: a block ends at the first closing tag
static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());

static EVENT_HANDLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)on[a-z0-9_]+=(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});

static JAVASCRIPT_SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());

static DATA_HTML_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)data:\s*text/html").unwrap());

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").unwrap());

// =============================================================================
// Helpers
// =============================================================================

fn strip_dangerous(input: &str) -> String {
    let mut result = input.to_string();
    for re in [
        &*SCRIPT_BLOCK_RE,
        &*EVENT_HANDLER_RE,
        &*JAVASCRIPT_SCHEME_RE,
        &*DATA_HTML_RE,
    ] {
        result = re.replace_all(&result, "").into_owned();
    }

    if result.len() != input.len() {
        debug!(
            removed_bytes = input.len() - result.len(),
            "sanitizer removed dangerous content"
        );
    }

    result
}

/// Entity-encode `&`, `<`, `>`, `"` and `'`.
///
/// `&` is encoded before the others so the entities introduced here are not
/// themselves re-encoded.
#[must_use]
pub fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

/// Returns `true` if `input` holds anything the sanitizer would strip.
#[must_use]
pub fn contains_dangerous_content(input: &str) -> bool {
    SCRIPT_BLOCK_RE.is_match(input)
        || EVENT_HANDLER_RE.is_match(input)
        || JAVASCRIPT_SCHEME_RE.is_match(input)
        || DATA_HTML_RE.is_match(input)
}

// =============================================================================
// Sanitizers
// =============================================================================

/// Sanitize free text for safe interpolation into markup.
///
/// Absent input yields an empty string.
///
/// ```rust
/// use dermis_foundation::security::sanitize_input;
///
/// assert_eq!(sanitize_input(Some("<script>alert(1)</script>Hello")), "Hello");
/// assert_eq!(sanitize_input(Some("a < b")), "a &lt; b");
/// ```
#[must_use]
pub fn sanitize_input(input: Option<&str>) -> String {
    match input {
        Some(input) => escape_html(&strip_dangerous(input)),
        None => String::new(),
    }
}

/// Sanitize markup, keeping only the listed tags.
///
/// With an empty allow-list the result is fully entity-encoded, the same as
/// [`sanitize_input`]. Otherwise every tag whose lowercased name is listed is
/// re-emitted bare (`<b>`, `</b>`) with its attributes dropped, and every
/// other tag marker is deleted while the text between tags is kept.
#[must_use]
pub fn sanitize_html(html: Option<&str>, allowed_tags: &[&str]) -> String {
    let Some(html) = html else {
        return String::new();
    };

    let stripped = strip_dangerous(html);
    if allowed_tags.is_empty() {
        return escape_html(&stripped);
    }

    TAG_RE
        .replace_all(&stripped, |caps: &regex::Captures<'_>| {
            let name = caps[2].to_ascii_lowercase();
            if allowed_tags.iter().any(|tag| tag.eq_ignore_ascii_case(&name)) {
                format!("<{}{}>", &caps[1], name)
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Sanitize every string inside a JSON value.
///
/// Returns a new value; arrays and objects are walked recursively, object
/// keys and non-string scalars are copied unchanged.
#[must_use]
pub fn sanitize_object(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_input(Some(s))),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_object).collect()),
        Value::Object(obj) => {
            let mut sanitized = Map::with_capacity(obj.len());
            for (key, item) in obj {
                sanitized.insert(key.clone(), sanitize_object(item));
            }
            Value::Object(sanitized)
        }
        other => other.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
