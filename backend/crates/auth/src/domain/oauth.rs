//! Identity Provider Port
//!
//! Authorization-code exchange. The reqwest implementation lives in
//! `infra::oauth`; tests substitute a canned profile.

use crate::domain::value_object::oauth_provider::OAuthProvider;
use crate::error::AuthResult;

/// What a provider tells us about the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthProfile {
    /// Stable provider-side user id
    pub provider_account_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    /// Provider handle (GitHub `login`), preferred when deriving a username
    pub login: Option<String>,
    pub image: Option<String>,
}

impl OAuthProfile {
    /// Source for a derived username: the login, else the email local part
    pub fn username_hint(&self) -> &str {
        self.login
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| self.email.as_deref().and_then(|e| e.split('@').next()))
            .unwrap_or_default()
    }
}

#[trait_variant::make(OAuthClient: Send)]
pub trait LocalOAuthClient {
    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> AuthResult<OAuthProfile>;
}
