//! Email address validation for the inquiry form.

use once_cell::sync::Lazy;
use regex::Regex;

// Deliberately loose: one @, no whitespace, a dot somewhere in the domain.
// Deliverability is the mail provider's problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Check whether a string looks like an email address.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.jp"));
    }

    #[test]
    fn rejects_missing_domain() {
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn rejects_missing_local_part() {
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(" user@example.com"));
    }

    #[test]
    fn rejects_empty() {
        assert!(!is_valid_email(""));
    }
}
