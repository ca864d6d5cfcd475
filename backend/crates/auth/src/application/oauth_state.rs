//! OAuth State
//!
//! Signed `state` parameter for the authorization-code flow:
//!
//! ```text
//! {nonce}.{expires_at}.{provider}.{base64url(callback)}.{base64url(hmac)}
//! ```
//!
//! The same value is stored in a short-lived cookie; the callback accepts it
//! only when signature, expiry, provider and cookie all match.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use platform::crypto::{
    constant_time_eq, from_base64url, hmac_sha256, hmac_sha256_verify, random_token,
    to_base64url,
};

use crate::domain::value_object::oauth_provider::OAuthProvider;
use crate::error::{AuthError, AuthResult};

const NONCE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState {
    pub nonce: String,
    pub expires_at: i64,
    pub provider: OAuthProvider,
    /// Where to send the browser after the callback
    pub callback: String,
}

impl OAuthState {
    pub fn new(provider: OAuthProvider, callback: impl Into<String>, ttl: Duration) -> Self {
        Self::issued_at(provider, callback, ttl, Utc::now())
    }

    pub fn issued_at(
        provider: OAuthProvider,
        callback: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            nonce: random_token(NONCE_LEN),
            expires_at: now.timestamp() + ttl.as_secs() as i64,
            provider,
            callback: callback.into(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    fn payload(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.nonce,
            self.expires_at,
            self.provider.id(),
            to_base64url(self.callback.as_bytes())
        )
    }

    pub fn sign(&self, secret: &[u8]) -> AuthResult<String> {
        let payload = self.payload();
        let tag = hmac_sha256(secret, payload.as_bytes())
            .map_err(|e| AuthError::Internal(format!("state signing failed: {e}")))?;
        Ok(format!("{}.{}", payload, to_base64url(&tag)))
    }

    /// Parse and check a returned `state` against the stored cookie
    pub fn verify(
        state: &str,
        cookie: Option<&str>,
        provider: OAuthProvider,
        secret: &[u8],
    ) -> AuthResult<Self> {
        Self::verify_at(state, cookie, provider, secret, Utc::now())
    }

    pub fn verify_at(
        state: &str,
        cookie: Option<&str>,
        provider: OAuthProvider,
        secret: &[u8],
        now: DateTime<Utc>,
    ) -> AuthResult<Self> {
        let cookie = cookie.ok_or(AuthError::InvalidOAuthState)?;
        if !constant_time_eq(state.as_bytes(), cookie.as_bytes()) {
            return Err(AuthError::InvalidOAuthState);
        }

        let (payload, signature) = state.rsplit_once('.').ok_or(AuthError::InvalidOAuthState)?;
        let signature = from_base64url(signature).map_err(|_| AuthError::InvalidOAuthState)?;
        if !hmac_sha256_verify(secret, payload.as_bytes(), &signature) {
            return Err(AuthError::InvalidOAuthState);
        }

        let parsed = Self::parse_payload(payload).ok_or(AuthError::InvalidOAuthState)?;
        if parsed.provider != provider || now.timestamp() >= parsed.expires_at {
            return Err(AuthError::InvalidOAuthState);
        }
        Ok(parsed)
    }

    fn parse_payload(payload: &str) -> Option<Self> {
        let mut parts = payload.split('.');
        let nonce = parts.next()?;
        let expires_at = parts.next()?.parse().ok()?;
        let provider = parts.next()?.parse().ok()?;
        let callback = String::from_utf8(from_base64url(parts.next()?).ok()?).ok()?;
        if parts.next().is_some() || nonce.is_empty() {
            return None;
        }

        Some(Self {
            nonce: nonce.to_string(),
            expires_at,
            provider,
            callback,
        })
    }
}
