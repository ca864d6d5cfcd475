//! Session Token
//!
//! The cookie value is `"{session_id}.{base64url(hmac_sha256(session_id))}"`.
//! Only the signature check happens here; the session row is still looked up.

use platform::crypto::{from_base64url, hmac_sha256, hmac_sha256_verify, to_base64url};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Sign a session id
pub fn sign(session_id: Uuid, secret: &[u8]) -> AuthResult<String> {
    let id = session_id.to_string();
    let tag = hmac_sha256(secret, id.as_bytes())
        .map_err(|e| AuthError::Internal(format!("session token signing failed: {e}")))?;
    Ok(format!("{}.{}", id, to_base64url(&tag)))
}

/// Verify a token and return the session id it names
pub fn verify(token: &str, secret: &[u8]) -> AuthResult<Uuid> {
    let (id, signature) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;
    let signature = from_base64url(signature).map_err(|_| AuthError::SessionInvalid)?;

    if !hmac_sha256_verify(secret, id.as_bytes(), &signature) {
        return Err(AuthError::SessionInvalid);
    }

    id.parse().map_err(|_| AuthError::SessionInvalid)
}
