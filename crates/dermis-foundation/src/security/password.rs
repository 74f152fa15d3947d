//! Password strength estimation
//!
//! A heuristic 0-4 score for live feedback while a password is typed. It
//! rewards length and character variety and penalises single-class and
//! repetitive passwords. It is not an entropy estimate.

use dermis_kernel::security::{PasswordStrength, StrengthLabel};

const SYMBOLS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

const MAX_SUGGESTIONS: usize = 3;

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Three or more identical characters in a row.
fn has_repeated_run(chars: &[char]) -> bool {
    chars
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2] && !is_line_terminator(w[0]))
}

/// Score a password.
///
/// ```rust
/// use dermis_foundation::security::check_password_strength;
///
/// let strength = check_password_strength("MyP@ssw0rd123");
/// assert_eq!(strength.score, 4);
/// assert!(strength.suggestions.is_empty());
/// ```
#[must_use]
pub fn check_password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            label: StrengthLabel::VeryWeak,
            suggestions: vec!["Enter a password".to_string()],
        };
    }

    let chars: Vec<char> = password.chars().collect();
    let mut score = 0.0_f64;
    let mut suggestions: Vec<&str> = Vec::new();

    if chars.len() >= 8 {
        score += 1.0;
    } else {
        suggestions.push("Use at least 8 characters");
    }
    if chars.len() >= 12 {
        score += 1.0;
    }

    let classes = [
        (chars.iter().any(char::is_ascii_lowercase), "Add lowercase letters"),
        (chars.iter().any(char::is_ascii_uppercase), "Add uppercase letters"),
        (chars.iter().any(char::is_ascii_digit), "Add numbers"),
        (chars.iter().any(|c| SYMBOLS.contains(*c)), "Add special characters"),
    ];
    for (present, suggestion) in classes {
        if present {
            score += 0.5;
        } else {
            suggestions.push(suggestion);
        }
    }

    if chars.iter().all(char::is_ascii_alphabetic) {
        score -= 1.0;
        suggestions.push("Avoid using only letters");
    }
    if chars.iter().all(char::is_ascii_digit) {
        score -= 1.0;
        suggestions.push("Avoid using only numbers");
    }
    if has_repeated_run(&chars) {
        score -= 0.5;
        suggestions.push("Avoid repeated characters");
    }

    // f64::round rounds half away from zero
    let score = score.round().clamp(0.0, 4.0) as u8;

    PasswordStrength {
        score,
        label: StrengthLabel::from_score(score),
        suggestions: suggestions
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect(),
    }
}

// =============================================================================
// Tests
// =============================================================================
