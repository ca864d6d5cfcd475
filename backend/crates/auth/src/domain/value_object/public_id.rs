//! Public ID Value Object
//!
//! The user identifier exposed in API responses and profile URLs
//! (`/profile/{public_id}`). A 21 character Nanoid, so internal UUIDs never
//! leave the server.

use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use nid::Nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(Nanoid);

impl PublicId {
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    pub fn parse_str(s: &str) -> AppResult<Self> {
        Nanoid::from_str(s)
            .map(Self)
            .map_err(|e| AppError::bad_request(format!("Invalid public id: {e}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PublicId {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Self::parse_str(s)
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unique_and_21_chars() {
        let a = PublicId::new();
        let b = PublicId::new();
        assert_eq!(a.as_str().len(), 21);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_display_match() {
        let id: PublicId = "V1StGXR8_Z5jdHi6B-myT".parse().unwrap();
        assert_eq!(id.to_string(), "V1StGXR8_Z5jdHi6B-myT");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(PublicId::parse_str("not a nanoid!").is_err());
        assert_eq!(PublicId::parse_str("short").unwrap_err().status_code(), 400);
    }
}
