//! Display Name Value Object
//!
//! The user's full name. Any script is accepted.

use kernel::validation::{Rule, check_all};
use serde::Serialize;

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 50;

pub const NAME_TOO_SHORT: &str = "Full name must be at least 3 characters long.";
pub const NAME_TOO_LONG: &str = "Full name is too long.";
pub const NAME_INVALID_CHARS: &str = "Full name can only contain letters, numbers, and spaces.";

pub const NAME_RULES: &[Rule<str>] = &[
    Rule::new(|s: &str| s.chars().count() >= NAME_MIN_LENGTH, NAME_TOO_SHORT),
    Rule::new(|s: &str| s.chars().count() <= NAME_MAX_LENGTH, NAME_TOO_LONG),
    Rule::new(
        |s: &str| !s.is_empty() && s.chars().all(is_name_char),
        NAME_INVALID_CHARS,
    ),
];

/// Letters of any script, ASCII digits, apostrophe, space and hyphen
#[inline]
pub fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || matches!(c, '\'' | ' ' | '-')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(input: &str) -> Result<Self, Vec<&'static str>> {
        let trimmed = input.trim();
        check_all(trimmed, NAME_RULES)?;
        Ok(Self(trimmed.to_string()))
    }

    /// Name reported by an identity provider, trimmed and capped but not
    /// otherwise checked
    pub fn from_profile(name: &str) -> Self {
        Self(name.trim().chars().take(NAME_MAX_LENGTH).collect())
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["Valid Name", "Jean-Luc Picard", "O'Neil", "José Álvarez", "山田 太郎", "R2 D2"] {
            assert!(DisplayName::parse(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_symbols_rejected() {
        assert_eq!(
            DisplayName::parse("John@Doe").unwrap_err(),
            vec![NAME_INVALID_CHARS]
        );
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(DisplayName::parse(" Jo ").unwrap_err(), vec![NAME_TOO_SHORT]);
        assert_eq!(
            DisplayName::parse(&"a".repeat(51)).unwrap_err(),
            vec![NAME_TOO_LONG]
        );
        assert!(DisplayName::parse(&"a".repeat(50)).is_ok());
    }
}
