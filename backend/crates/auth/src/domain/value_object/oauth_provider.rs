//! OAuth Provider Value Object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported social sign-in providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Github,
    Google,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Github, OAuthProvider::Google];

    /// Stored in `accounts.provider_id` and used in callback paths
    pub const fn id(&self) -> &'static str {
        match self {
            OAuthProvider::Github => "github",
            OAuthProvider::Google => "google",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            OAuthProvider::Github => "GitHub",
            OAuthProvider::Google => "Google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for OAuthProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// `accounts.provider_id` value for email/password accounts
pub const CREDENTIAL_PROVIDER_ID: &str = "credential";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("github".parse::<OAuthProvider>(), Ok(OAuthProvider::Github));
        assert_eq!("google".parse::<OAuthProvider>(), Ok(OAuthProvider::Google));
        assert!("GitHub".parse::<OAuthProvider>().is_err());
        assert!(CREDENTIAL_PROVIDER_ID.parse::<OAuthProvider>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OAuthProvider::Github).unwrap();
        assert_eq!(json, "\"github\"");
    }
}
