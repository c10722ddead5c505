//! Validation helpers for signup and profile rules

use regex::Regex;

/// Minimum trimmed display-name length
pub const MIN_NAME_LEN: usize = 2;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static::lazy_static! {
    /// Two-part `local@domain.tld` email shape.
    /// Deliberately simple; deliverability is the mail system's problem.
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Validate an email address against the two-part shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Split a display name on the first whitespace run.
///
/// The first token becomes the first name; the remainder (possibly empty)
/// becomes the last name with single-space joining.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}
