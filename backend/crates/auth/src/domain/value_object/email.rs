//! Email Value Object
//!
//! Syntactic validation only. Stored lowercased, which is also the form
//! uniqueness is checked against.

use kernel::validation::{Rule, check_all};
use serde::{Deserialize, Serialize};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

pub const EMAIL_INVALID: &str = "Please enter a valid email address.";

pub const EMAIL_RULES: &[Rule<str>] = &[Rule::new(is_valid_email, EMAIL_INVALID)];

/// `local@domain.tld` with a conservative character set
///
/// Local part: `A-Z a-z 0-9 _ ' + - .`, no leading dot, no `..`, and it may
/// not end with `.` or `'`. Domain: dot separated labels of letters, digits
/// and `-` (not leading), ending in an alphabetic TLD of two or more letters.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LENGTH {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    let Some(last) = local.chars().last() else {
        return false;
    };
    !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'))
        && (last.is_ascii_alphanumeric() || matches!(last, '_' | '+' | '-'))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    !hosts.is_empty()
        && hosts.iter().all(|label| {
            label.starts_with(|c: char| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate the address as typed, then store it lowercased
    pub fn parse(input: &str) -> Result<Self, Vec<&'static str>> {
        let email = input.trim();
        check_all(email, EMAIL_RULES)?;
        Ok(Self(email.to_lowercase()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or_default()
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::parse("test@test.com").is_ok());
        assert!(Email::parse("user.name@example.co.jp").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("o'brien@mail-host.ie").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        for bad in [
            "",
            "invalid-email",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@example.c",
            ".user@example.com",
            "us..er@example.com",
            "user.@example.com",
            "user@-example.com",
            "user@exa_mple.com",
            "user name@example.com",
        ] {
            assert_eq!(Email::parse(bad).unwrap_err(), vec![EMAIL_INVALID], "{bad}");
        }
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::parse("User@Example.COM").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
        assert_eq!(email.local_part(), "user");
        assert_eq!(email.domain(), "example.com");
    }
}
