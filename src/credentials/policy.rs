//! Password strength rules applied at registration.

use regex::Regex;
use std::{collections::HashMap, fmt};

pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Character-overlap ratio at or above which a password counts as similar.
pub const MAX_SIMILARITY: f64 = 0.7;

// Small built-in deny list; lowercase, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "123456",
    "123456789",
    "12345678",
    "1234567890",
    "111111",
    "000000",
    "password",
    "password1",
    "password123",
    "passw0rd",
    "qwerty",
    "qwerty123",
    "qwertyuiop",
    "abc123",
    "abcd1234",
    "iloveyou",
    "admin",
    "admin123",
    "welcome",
    "welcome1",
    "letmein",
    "monkey",
    "dragon",
    "football",
    "baseball",
    "sunshine",
    "princess",
    "superman",
    "trustno1",
    "1q2w3e4r",
    "zaq12wsx",
    "starwars",
    "whatever",
    "changeme",
    "secret",
];

/// Which user attribute a password resembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Username,
    Email,
}

impl Attribute {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("The password is too similar to the {0}.")]
    TooSimilar(Attribute),
    #[error("This password is too short. It must contain at least {min_length} characters.")]
    TooShort { min_length: usize },
    #[error("This password is too common.")]
    TooCommon,
    #[error("This password is entirely numeric.")]
    EntirelyNumeric,
}

/// Configurable password policy. Length, common and numeric rules are on by
/// default; the similarity rule is opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
    reject_numeric: bool,
    reject_common: bool,
    reject_similar: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            reject_numeric: true,
            reject_common: true,
            reject_similar: false,
        }
    }
}

impl PasswordPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    #[must_use]
    pub const fn with_reject_numeric(mut self, reject: bool) -> Self {
        self.reject_numeric = reject;
        self
    }

    #[must_use]
    pub const fn with_reject_common(mut self, reject: bool) -> Self {
        self.reject_common = reject;
        self
    }

    #[must_use]
    pub const fn with_reject_similar(mut self, reject: bool) -> Self {
        self.reject_similar = reject;
        self
    }

    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check `password` against every enabled rule.
    ///
    /// # Errors
    /// Returns all violated rules, in evaluation order.
    pub fn validate(
        &self,
        password: &str,
        username: &str,
        email: &str,
    ) -> Result<(), Vec<PolicyViolation>> {
        let mut violations = Vec::new();

        if self.reject_similar {
            if let Some(attribute) = similar_attribute(password, username, email) {
                violations.push(PolicyViolation::TooSimilar(attribute));
            }
        }

        if password.chars().count() < self.min_length {
            violations.push(PolicyViolation::TooShort {
                min_length: self.min_length,
            });
        }

        if self.reject_common && is_common(password) {
            violations.push(PolicyViolation::TooCommon);
        }

        if self.reject_numeric && password.chars().all(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::EntirelyNumeric);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Join violations into the single message returned to clients.
#[must_use]
pub fn describe(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_common(password: &str) -> bool {
    let lowered = password.trim().to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

fn similar_attribute(password: &str, username: &str, email: &str) -> Option<Attribute> {
    let password = password.to_lowercase();

    [(Attribute::Username, username), (Attribute::Email, email)]
        .into_iter()
        .find_map(|(attribute, value)| {
            let value = value.trim().to_lowercase();
            value_parts(&value)
                .into_iter()
                .filter(|part| !part.is_empty())
                .filter(|part| !exceeds_length_ratio(&password, part))
                .any(|part| quick_ratio(&password, part) >= MAX_SIMILARITY)
                .then_some(attribute)
        })
}

/// The attribute itself plus its word-separated pieces (`jane.doe@example.com`
/// yields `jane`, `doe`, `example`, `com`).
fn value_parts(value: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Regex::new(r"\W+")
        .map(|re| re.split(value).collect())
        .unwrap_or_default();
    parts.push(value);
    parts
}

/// A password far longer than the attribute cannot reach the ratio.
#[allow(clippy::cast_precision_loss)]
fn exceeds_length_ratio(password: &str, part: &str) -> bool {
    let password_len = password.chars().count();
    let part_len = part.chars().count();
    password_len >= 10 * part_len && (part_len as f64) < MAX_SIMILARITY / 2.0 * password_len as f64
}

/// `2 * common / total` over the character multisets of both strings.
#[allow(clippy::cast_precision_loss)]
fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut common = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }

    2.0 * common as f64 / total as f64
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            policy.validate("correct-Horse-battery-9", "alice", "alice@example.com"),
            Ok(())
        );
    }

    #[test]
    fn short_numeric_password_reports_every_violation() {
        let policy = PasswordPolicy::default();
        let violations = policy
            .validate("123", "alice", "alice@example.com")
            .err()
            .unwrap_or_default();
        assert_eq!(
            violations,
            vec![
                PolicyViolation::TooShort { min_length: 8 },
                PolicyViolation::EntirelyNumeric,
            ]
        );
        assert_eq!(
            describe(&violations),
            "This password is too short. It must contain at least 8 characters., This password is entirely numeric."
        );
    }

    #[test]
    fn common_password_is_case_insensitive() {
        let policy = PasswordPolicy::default();
        let violations = policy
            .validate("PassWord123", "alice", "alice@example.com")
            .err()
            .unwrap_or_default();
        assert_eq!(violations, vec![PolicyViolation::TooCommon]);
    }

    #[test]
    fn similarity_is_off_by_default() {
        let policy = PasswordPolicy::default();
        assert_eq!(policy.validate("ramirez99", "ramirez", "zr@example.com"), Ok(()));
    }

    #[test]
    fn password_close_to_username_is_rejected() {
        let policy = PasswordPolicy::new().with_reject_similar(true);
        let violations = policy
            .validate("Ramirez99", "ramirez", "zr@example.com")
            .err()
            .unwrap_or_default();
        assert_eq!(
            violations,
            vec![PolicyViolation::TooSimilar(Attribute::Username)]
        );
    }

    #[test]
    fn password_containing_short_username_is_not_similar() {
        let policy = PasswordPolicy::new().with_reject_similar(true);
        assert_eq!(
            policy.validate("Bobcat-Rocks-77", "bob", "bob@example.com"),
            Ok(())
        );
    }

    #[test]
    fn password_matching_email_is_rejected() {
        let policy = PasswordPolicy::new().with_reject_similar(true);
        let violations = policy
            .validate("jane.doe@example", "jd", "Jane.Doe@example.com")
            .err()
            .unwrap_or_default();
        assert_eq!(violations, vec![PolicyViolation::TooSimilar(Attribute::Email)]);
        assert_eq!(
            violations[0].to_string(),
            "The password is too similar to the email address."
        );
    }

    #[test]
    fn quick_ratio_counts_shared_characters() {
        assert!((quick_ratio("abcd", "abcd") - 1.0).abs() < f64::EPSILON);
        assert!((quick_ratio("abcd", "wxyz")).abs() < f64::EPSILON);
        assert!((quick_ratio("aab", "abb") - 2.0 * 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let policy = PasswordPolicy::new()
            .with_min_length(4)
            .with_reject_numeric(false)
            .with_reject_common(false)
            .with_reject_similar(false);
        assert_eq!(policy.min_length(), 4);
        assert_eq!(policy.validate("123456", "123456", "a@b.co"), Ok(()));
    }
}
