//! Social Sign In Use Case
//!
//! Starts the authorization-code flow: builds the provider's authorize URL
//! and the signed state the callback will check.

use std::sync::Arc;

use kernel::validation::FieldErrors;
use url::Url;

use crate::application::config::{AuthConfig, OAuthProviderConfig};
use crate::application::oauth_state::OAuthState;
use crate::domain::value_object::oauth_provider::OAuthProvider;
use crate::error::{AuthError, AuthResult};

pub const CALLBACK_URL_INVALID: &str = "Invalid callback URL";

pub struct SocialSignInInput {
    pub provider: String,
    pub callback_url: Option<String>,
}

#[derive(Debug)]
pub struct SocialSignInOutput {
    pub provider: OAuthProvider,
    /// Provider authorize URL the browser should visit
    pub url: String,
    /// Signed state, also stored in the state cookie
    pub state: String,
}

pub struct SocialSignInUseCase {
    config: Arc<AuthConfig>,
}

impl SocialSignInUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, input: SocialSignInInput) -> AuthResult<SocialSignInOutput> {
        let provider: OAuthProvider = input
            .provider
            .parse()
            .map_err(|_| AuthError::UnsupportedProvider(input.provider.clone()))?;
        let provider_config = self
            .config
            .provider(provider)
            .ok_or_else(|| AuthError::UnsupportedProvider(provider.id().to_string()))?;

        let callback =
            resolve_callback(input.callback_url.as_deref(), &self.config.public_base_url)?;

        let state = OAuthState::new(provider, callback, self.config.oauth_state_ttl)
            .sign(&self.config.session_secret)?;
        let url = authorize_url(provider_config, &self.config.redirect_uri(provider), &state)?;

        tracing::debug!(provider = %provider, "Social sign-in started");

        Ok(SocialSignInOutput {
            provider,
            url: url.into(),
            state,
        })
    }
}

/// Authorize endpoint with `client_id`, `redirect_uri`, `response_type`, `scope` and `state`
pub fn authorize_url(
    provider: &OAuthProviderConfig,
    redirect_uri: &str,
    state: &str,
) -> AuthResult<Url> {
    let mut url = Url::parse(&provider.authorize_url)
        .map_err(|e| AuthError::Internal(format!("invalid authorize URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &provider.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &provider.scopes.join(" "))
        .append_pair("state", state);
    Ok(url)
}

/// Accept `/path` or an absolute URL on the frontend origin, defaulting to `/`
///
/// Anything else would turn the callback into an open redirect.
pub fn resolve_callback(callback: Option<&str>, public_base_url: &str) -> AuthResult<String> {
    let callback = match callback.map(str::trim) {
        None | Some("") => return Ok("/".to_string()),
        Some(c) => c,
    };

    if callback.starts_with('/') && !callback.starts_with("//") && !callback.contains('\\') {
        return Ok(callback.to_string());
    }

    let same_origin = match (Url::parse(callback), Url::parse(public_base_url)) {
        (Ok(target), Ok(base)) => target.origin() == base.origin(),
        _ => false,
    };
    if same_origin {
        return Ok(callback.to_string());
    }

    let mut errors = FieldErrors::new();
    errors.push("callbackURL", CALLBACK_URL_INVALID);
    Err(errors.into())
}

/// Absolute URL for a resolved callback
pub fn absolute_callback(callback: &str, public_base_url: &str) -> String {
    if callback.starts_with('/') {
        format!("{public_base_url}{callback}")
    } else {
        callback.to_string()
    }
}
