//! Username Value Object
//!
//! The public handle shown next to questions, answers and votes.
//!
//! ## Invariants
//! - Trimmed
//! - 3 to 20 characters
//! - ASCII letters, digits and `_` only
//!
//! Uniqueness is exact-match: `Alice` and `alice` are different handles.

use std::fmt;

use kernel::validation::{Rule, check_all};
use serde::Serialize;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 20;

pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long.";
pub const USERNAME_TOO_LONG: &str = "Username cannot be longer than 20 characters.";
pub const USERNAME_INVALID_CHARS: &str = "Use only letters, numbers, or underscores — no spaces.";

pub const USERNAME_RULES: &[Rule<str>] = &[
    Rule::new(
        |s: &str| s.chars().count() >= USERNAME_MIN_LENGTH,
        USERNAME_TOO_SHORT,
    ),
    Rule::new(
        |s: &str| s.chars().count() <= USERNAME_MAX_LENGTH,
        USERNAME_TOO_LONG,
    ),
    Rule::new(
        |s: &str| !s.is_empty() && s.chars().all(is_username_char),
        USERNAME_INVALID_CHARS,
    ),
];

#[inline]
pub fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate, returning every failed rule's message
    pub fn parse(input: &str) -> Result<Self, Vec<&'static str>> {
        let trimmed = input.trim();
        check_all(trimmed, USERNAME_RULES)?;
        Ok(Self::from_trusted(trimmed))
    }

    /// Rebuild from a stored value
    pub fn from_db(original: impl Into<String>) -> Self {
        Self::from_trusted(original)
    }

    fn from_trusted(original: impl Into<String>) -> Self {
        Self(original.into())
    }

    /// As typed by the user
    #[inline]
    pub fn original(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Username derived from an identity provider profile
    ///
    /// Keeps only allowed characters, pads short handles with `_`, and caps
    /// the result so a numeric suffix still fits (see [`Username::with_suffix`]).
    pub fn derive_from(hint: &str) -> Self {
        let mut base: String = hint
            .chars()
            .filter(|c| is_username_char(*c))
            .take(USERNAME_MAX_LENGTH)
            .collect();
        if base.is_empty() {
            base.push_str("user");
        }
        while base.len() < USERNAME_MIN_LENGTH {
            base.push('_');
        }
        Self::from_trusted(base)
    }

    /// `self` with `suffix` appended, truncating the base to stay within bounds
    pub fn with_suffix(&self, suffix: u32) -> Self {
        let suffix = suffix.to_string();
        let keep = USERNAME_MAX_LENGTH.saturating_sub(suffix.len());
        let base: String = self.0.chars().take(keep).collect();
        Self::from_trusted(format!("{base}{suffix}"))
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({:?})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["abc", "user_123", "John_Doe", "a".repeat(20).as_str()] {
            assert!(Username::parse(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_trims_before_checking() {
        let name = Username::parse("  valid_user  ").unwrap();
        assert_eq!(name.original(), "valid_user");
    }

    #[test]
    fn test_too_short() {
        assert_eq!(Username::parse("ab").unwrap_err(), vec![USERNAME_TOO_SHORT]);
    }

    #[test]
    fn test_too_long() {
        let err = Username::parse(&"a".repeat(21)).unwrap_err();
        assert_eq!(err, vec![USERNAME_TOO_LONG]);
    }

    #[test]
    fn test_space_and_symbols_rejected() {
        assert_eq!(
            Username::parse("john doe").unwrap_err(),
            vec![USERNAME_INVALID_CHARS]
        );
        assert!(Username::parse("john.doe").is_err());
        assert!(Username::parse("jöhn").is_err());
    }

    #[test]
    fn test_every_failure_reported() {
        let err = Username::parse("a b").unwrap_err();
        assert_eq!(err, vec![USERNAME_INVALID_CHARS]);

        let err = Username::parse("").unwrap_err();
        assert_eq!(err, vec![USERNAME_TOO_SHORT, USERNAME_INVALID_CHARS]);
    }

    #[test]
    fn test_case_is_significant() {
        let upper = Username::parse("Alice_01").unwrap();
        let lower = Username::parse("alice_01").unwrap();
        assert_eq!(upper.original(), "Alice_01");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_derive_from_profile() {
        assert_eq!(Username::derive_from("octo-cat").original(), "octocat");
        assert_eq!(Username::derive_from("jo").original(), "jo_");
        assert_eq!(Username::derive_from("名前").original(), "user");
        assert_eq!(
            Username::derive_from("a_really_long_github_login_name").original(),
            "a_really_long_github"
        );
    }

    #[test]
    fn test_with_suffix_stays_in_bounds() {
        let base = Username::derive_from("a_really_long_github_login_name");
        let suffixed = base.with_suffix(42);
        assert_eq!(suffixed.original(), "a_really_long_gith42");
        assert!(Username::parse(suffixed.original()).is_ok());
    }
}
