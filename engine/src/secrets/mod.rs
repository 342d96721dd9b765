//! Secret handling
//!
//! The provider credential and webhook address are read from the environment
//! and carried as [`SecretString`]. Transport and provider error messages can
//! still echo them back (request URLs, response bodies), so anything bound for
//! the log goes through [`scrub`] first.

pub mod string;

pub use string::SecretString;

use regex::Regex;
use std::sync::OnceLock;

/// Regex patterns for detecting secrets that show up in this job's traffic,
/// paired with their replacement. These are compiled once and reused.
static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

/// Initializes and returns the secret detection patterns.
///
/// Patterns match:
/// - Google API keys: AIza[0-9A-Za-z-_]{35}
/// - `key=` query parameters
/// - Discord webhook tokens: /api/webhooks/<id>/<token>
fn get_secret_patterns() -> &'static Vec<(Regex, &'static str)> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"AIza[0-9A-Za-z\-_]{35}").expect("Invalid Google pattern"),
                "[REDACTED]",
            ),
            (
                Regex::new(r"([?&]key=)[^&\s)]+").expect("Invalid query key pattern"),
                "${1}[REDACTED]",
            ),
            (
                Regex::new(r"(/api/webhooks/[0-9]+/)[A-Za-z0-9\-_.]+")
                    .expect("Invalid Discord webhook pattern"),
                "${1}[REDACTED]",
            ),
        ]
    })
}

/// Remove secrets from text before it is logged or wrapped into an error.
///
/// # Examples
///
/// ```
/// use qotd_engine::secrets::scrub;
///
/// let scrubbed = scrub("POST https://discord.com/api/webhooks/123/abcDEF failed");
/// assert_eq!(scrubbed, "POST https://discord.com/api/webhooks/123/[REDACTED] failed");
/// ```
pub fn scrub(text: &str) -> String {
    let mut result = text.to_string();

    for (pattern, replacement) in get_secret_patterns() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}
