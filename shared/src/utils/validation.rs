//! Email validation and masking helpers

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Maximum length of an email address (RFC 5321)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Check if an email address has a plausible shape
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email)
}

/// Trim and lowercase an email address for use as a store key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Mask an identity for logging: `alice@example.com` -> `a***@example.com`
///
/// Values without an `@` keep only their first character.
pub fn mask_email(value: &str) -> String {
    match value.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => {
            let first = value.chars().next().map(String::from).unwrap_or_default();
            format!("{}***", first)
        }
    }
}
