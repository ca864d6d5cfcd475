//! User Password Value Object
//!
//! Domain wrapper over `platform::password`. Composition rules come from
//! [`password_rules`](super::password_rules); hashing and zeroization from
//! the platform crate.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};

use super::password_rules::{PASSWORD_TOO_LONG, password_checks};

/// Password as typed, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Check every password rule, returning all failure messages
    pub fn parse(raw: String) -> Result<Self, Vec<&'static str>> {
        let failures: Vec<&'static str> = password_checks()
            .filter(|rule| !rule.passes(&raw))
            .map(|rule| rule.message)
            .collect();
        if !failures.is_empty() {
            return Err(failures);
        }

        ClearTextPassword::new(raw).map(Self).map_err(|e| {
            vec![match e {
                PasswordPolicyError::TooLong { .. } => PASSWORD_TOO_LONG,
                PasswordPolicyError::InvalidCharacter => "Password contains invalid characters.",
                PasswordPolicyError::TooShort { .. } | PasswordPolicyError::EmptyOrWhitespace => {
                    "Password must be at least 8 characters long."
                }
            }]
        })
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Argon2id hash for storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))
    }

    /// Restore from the stored PHC string
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<RawPassword, Vec<&'static str>> {
        RawPassword::parse(raw.to_string())
    }

    #[test]
    fn test_valid_password() {
        assert!(parse("Password123!").is_ok());
    }

    #[test]
    fn test_each_missing_class_has_its_message() {
        assert_eq!(
            parse("password123!").unwrap_err(),
            vec!["Add at least one uppercase letter (A–Z)."]
        );
        assert_eq!(
            parse("PASSWORD123!").unwrap_err(),
            vec!["Add at least one lowercase letter (a–z)."]
        );
        assert_eq!(
            parse("Password!").unwrap_err(),
            vec!["Include at least one number (0–9)."]
        );
        assert_eq!(
            parse("Password123").unwrap_err(),
            vec!["Include at least one special character (e.g. ! @ # $ %)."]
        );
        assert_eq!(
            parse("Pas1!").unwrap_err(),
            vec!["Password must be at least 8 characters long."]
        );
    }

    #[test]
    fn test_too_long() {
        let err = parse(&format!("{}a1!", "P".repeat(64))).unwrap_err();
        assert_eq!(err, vec![PASSWORD_TOO_LONG]);
    }

    #[test]
    fn test_all_failures_reported_together() {
        let err = parse("").unwrap_err();
        assert_eq!(err.len(), 5);
        assert_eq!(err[0], "Password must be at least 8 characters long.");
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = parse("Password123!").unwrap();
        let hashed = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        assert!(hashed.verify(&raw, Some(b"pepper")));
        assert!(!hashed.verify(&parse("Password124!").unwrap(), Some(b"pepper")));

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, Some(b"pepper")));
    }
}
