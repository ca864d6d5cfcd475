//! Auth API Client
//!
//! [`AuthClient`] is what the forms call; [`HttpAuthClient`] talks to the
//! `/api/auth` endpoints over reqwest.

use std::time::Duration;

use auth::domain::value_object::oauth_provider::OAuthProvider;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const USER_AGENT: &str = concat!("devoverflow-auth-client/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialBody {
    pub provider: OAuthProvider,
    #[serde(rename = "callbackURL", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSuccess {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialRedirect {
    pub url: String,
    #[serde(default)]
    pub redirect: bool,
}

// ============================================================================
// Errors
// ============================================================================

/// Error object returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: u16,
}

impl ApiError {
    /// Server message, if it sent a non-blank one
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error object
    #[error("{}", .0.message().unwrap_or("request rejected"))]
    Api(ApiError),

    /// No usable answer: connection, timeout, or undecodable body
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Client trait
// ============================================================================

#[trait_variant::make(AuthClient: Send)]
pub trait LocalAuthClient {
    async fn sign_in_email(&self, body: &SignInBody) -> ClientResult<AuthSuccess>;

    async fn sign_up_email(&self, body: &SignUpBody) -> ClientResult<AuthSuccess>;

    /// Authorization URL to send the browser to
    async fn sign_in_social(&self, body: &SocialBody) -> ClientResult<SocialRedirect>;
}

// ============================================================================
// reqwest implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    http: Client,
    base_url: Url,
}

impl HttpAuthClient {
    /// `base_url` is the API origin, e.g. `http://localhost:31113`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Transport(format!("invalid base URL: {e}")))?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(&format!("{}{path}", auth::config::AUTH_BASE_PATH))
            .map_err(|e| ClientError::Transport(format!("invalid endpoint: {e}")))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.endpoint(path)?).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let bytes = response.bytes().await?;
        Err(ClientError::Api(api_error(status, &bytes)))
    }
}

/// Decode an error body, keeping the status when the body is not the error shape
fn api_error(status: StatusCode, body: &[u8]) -> ApiError {
    let mut err: ApiError = serde_json::from_slice(body).unwrap_or_default();
    err.status = status.as_u16();
    err
}

impl AuthClient for HttpAuthClient {
    async fn sign_in_email(&self, body: &SignInBody) -> ClientResult<AuthSuccess> {
        self.post("/sign-in/email", body).await
    }

    async fn sign_up_email(&self, body: &SignUpBody) -> ClientResult<AuthSuccess> {
        self.post("/sign-up/email", body).await
    }

    async fn sign_in_social(&self, body: &SocialBody) -> ClientResult<SocialRedirect> {
        self.post("/sign-in/social", body).await
    }
}
