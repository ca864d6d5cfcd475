//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::config::{ConfigError, optional_env, required_env};
use platform::cookie::CookieConfig;
use platform::crypto::{from_base64, random_bytes};

use crate::domain::value_object::oauth_provider::OAuthProvider;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Path prefix the auth router is mounted under
pub const AUTH_BASE_PATH: &str = "/api/auth";

/// Client credentials and endpoints of one identity provider
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub provider: OAuthProvider,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
}

impl OAuthProviderConfig {
    pub fn github(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            provider: OAuthProvider::Github,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            userinfo_url: "https://api.github.com/user".to_string(),
            scopes: vec!["read:user".to_string(), "user:email".to_string()],
        }
    }

    pub fn google(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            provider: OAuthProvider::Google,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_cookie_name: String,
    /// HMAC key for session tokens and OAuth state (32 bytes)
    pub session_secret: [u8; 32],
    pub session_ttl: Duration,
    pub oauth_state_cookie_name: String,
    pub oauth_state_ttl: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Where this service is reachable; OAuth redirect URIs are built from it
    pub base_url: String,
    /// Frontend origin; relative callback URLs resolve against it
    pub public_base_url: String,
    pub providers: Vec<OAuthProviderConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "devoverflow.session_token".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            oauth_state_cookie_name: "devoverflow.oauth_state".to_string(),
            oauth_state_ttl: Duration::from_secs(10 * 60),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            base_url: "http://localhost:31113".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            providers: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Read provider credentials, base URLs and secrets from the environment
    ///
    /// `AUTH_SESSION_SECRET` may be omitted in debug builds, in which case a
    /// random secret is generated and sessions do not survive a restart.
    pub fn from_env() -> Result<Self, ConfigError> {
        let providers = vec![
            OAuthProviderConfig::github(
                required_env("GITHUB_CLIENT_ID")?,
                required_env("GITHUB_CLIENT_SECRET")?,
            ),
            OAuthProviderConfig::google(
                required_env("GOOGLE_CLIENT_ID")?,
                required_env("GOOGLE_CLIENT_SECRET")?,
            ),
        ];
        let base_url = trim_trailing_slash(required_env("AUTH_BASE_URL")?);
        let public_base_url = trim_trailing_slash(required_env("PUBLIC_BASE_URL")?);

        let mut config = match optional_env("AUTH_SESSION_SECRET") {
            Some(encoded) => Self {
                session_secret: decode_secret(&encoded)?,
                ..Self::default()
            },
            None if cfg!(debug_assertions) => {
                tracing::warn!("AUTH_SESSION_SECRET not set, using a random secret");
                Self::development()
            }
            None => return Err(ConfigError::Missing("AUTH_SESSION_SECRET")),
        };

        config.cookie_secure = base_url.starts_with("https://");
        config.password_pepper = optional_env("AUTH_PASSWORD_PEPPER").map(String::into_bytes);
        config.base_url = base_url;
        config.public_base_url = public_base_url;
        config.providers = providers;
        Ok(config)
    }

    pub fn with_provider(mut self, provider: OAuthProviderConfig) -> Self {
        self.providers.retain(|p| p.provider != provider.provider);
        self.providers.push(provider);
        self
    }

    pub fn provider(&self, provider: OAuthProvider) -> Option<&OAuthProviderConfig> {
        self.providers.iter().find(|p| p.provider == provider)
    }

    /// `{base_url}/api/auth/callback/{provider}`
    pub fn redirect_uri(&self, provider: OAuthProvider) -> String {
        format!("{}{}/callback/{}", self.base_url, AUTH_BASE_PATH, provider.id())
    }

    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::days(7))
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::new(&self.session_cookie_name)
                .with_secure(self.cookie_secure)
                .with_max_age(self.session_ttl.as_secs() as i64)
        }
    }

    /// Scoped to the auth routes; the callback is a top-level GET, so `Lax` suffices
    pub fn oauth_state_cookie(&self) -> CookieConfig {
        CookieConfig::new(&self.oauth_state_cookie_name)
            .with_secure(self.cookie_secure)
            .with_path(AUTH_BASE_PATH)
            .with_max_age(self.oauth_state_ttl.as_secs() as i64)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

fn decode_secret(encoded: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = from_base64(encoded)
        .map_err(|e| ConfigError::invalid("AUTH_SESSION_SECRET", e.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        ConfigError::invalid(
            "AUTH_SESSION_SECRET",
            format!("expected 32 bytes, got {}", bytes.len()),
        )
    })
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
