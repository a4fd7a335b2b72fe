//! API handlers and shared validation helpers.

pub mod health;
pub mod profile;
pub mod register;
pub mod security_question;
pub mod types;

use regex::Regex;

pub const USER_NOT_FOUND: &str = "User not found";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Normalize an email for lookup/uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Treat whitespace-only values like absent ones.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_malformed() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("user@example"));
        assert!(!valid_email("us er@example.com"));
    }

    #[test]
    fn present_filters_blank_values() {
        let blank = "   ".to_string();
        let value = "x".to_string();
        assert_eq!(present(None), None);
        assert_eq!(present(Some(&blank)), None);
        assert_eq!(present(Some(&value)), Some("x"));
    }
}
