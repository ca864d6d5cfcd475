//! Identity Provider Client
//!
//! reqwest implementation of [`OAuthClient`] for GitHub and Google.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, header};
use serde::Deserialize;

use crate::application::config::{AuthConfig, OAuthProviderConfig};
use crate::domain::oauth::{OAuthClient, OAuthProfile};
use crate::domain::value_object::oauth_provider::OAuthProvider;
use crate::error::{AuthError, AuthResult};

const USER_AGENT: &str = concat!("devoverflow-auth/", env!("CARGO_PKG_VERSION"));
const GITHUB_EMAILS_URL: &str = "https://api.github.com/user/emails";

#[derive(Clone)]
pub struct HttpOAuthClient {
    http: Client,
    config: Arc<AuthConfig>,
}

impl HttpOAuthClient {
    pub fn new(config: Arc<AuthConfig>) -> AuthResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    async fn access_token(
        &self,
        provider: &OAuthProviderConfig,
        code: &str,
        redirect_uri: &str,
    ) -> AuthResult<String> {
        let response = self
            .http
            .post(&provider.token_url)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", provider.client_id.as_str()),
                ("client_secret", provider.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(exchange_error)?;

        let status = response.status();
        let body: TokenResponse = response.json().await.map_err(exchange_error)?;

        match body {
            TokenResponse {
                access_token: Some(token),
                ..
            } if status.is_success() => Ok(token),
            TokenResponse { error, .. } => Err(AuthError::OAuthExchange(format!(
                "token endpoint returned {status}: {}",
                error.unwrap_or_else(|| "no access token".to_string())
            ))),
        }
    }

    async fn get_json<T>(&self, url: &str, token: &str) -> AuthResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(exchange_error)?;

        if !response.status().is_success() {
            return Err(AuthError::OAuthExchange(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        response.json().await.map_err(exchange_error)
    }

    async fn github_profile(&self, provider: &OAuthProviderConfig, token: &str) -> AuthResult<OAuthProfile> {
        let user: GithubUser = self.get_json(&provider.userinfo_url, token).await?;

        // The public profile email is optional; fall back to the primary verified one
        let (email, email_verified) = match user.email {
            Some(email) => (Some(email), false),
            None => {
                let emails: Vec<GithubEmail> = self.get_json(GITHUB_EMAILS_URL, token).await?;
                emails
                    .into_iter()
                    .find(|e| e.primary && e.verified)
                    .map(|e| (Some(e.email), true))
                    .unwrap_or((None, false))
            }
        };

        Ok(OAuthProfile {
            provider_account_id: user.id.to_string(),
            email,
            email_verified,
            name: user.name,
            login: Some(user.login),
            image: user.avatar_url,
        })
    }

    async fn google_profile(&self, provider: &OAuthProviderConfig, token: &str) -> AuthResult<OAuthProfile> {
        let user: GoogleUser = self.get_json(&provider.userinfo_url, token).await?;

        Ok(OAuthProfile {
            provider_account_id: user.sub,
            email: user.email,
            email_verified: user.email_verified.unwrap_or(false),
            name: user.name,
            login: None,
            image: user.picture,
        })
    }
}

impl OAuthClient for HttpOAuthClient {
    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> AuthResult<OAuthProfile> {
        let provider_config = self
            .config
            .provider(provider)
            .ok_or_else(|| AuthError::UnsupportedProvider(provider.id().to_string()))?;

        let token = self.access_token(provider_config, code, redirect_uri).await?;

        match provider {
            OAuthProvider::Github => self.github_profile(provider_config, &token).await,
            OAuthProvider::Google => self.google_profile(provider_config, &token).await,
        }
    }
}

fn exchange_error(err: reqwest::Error) -> AuthError {
    AuthError::OAuthExchange(err.to_string())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_user_payload() {
        let user: GithubUser = serde_json::from_str(
            r#"{"id":583231,"login":"octocat","name":"The Octocat","email":null,"avatar_url":"https://avatars.githubusercontent.com/u/583231?v=4","type":"User"}"#,
        )
        .unwrap();
        assert_eq!(user.id, 583231);
        assert_eq!(user.login, "octocat");
        assert!(user.email.is_none());
    }

    #[test]
    fn test_google_user_payload() {
        let user: GoogleUser = serde_json::from_str(
            r#"{"sub":"1090","email":"jane@gmail.com","email_verified":true,"name":"Jane Doe","picture":"https://lh3.googleusercontent.com/a"}"#,
        )
        .unwrap();
        assert_eq!(user.sub, "1090");
        assert_eq!(user.email_verified, Some(true));
    }

    #[test]
    fn test_token_error_payload() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
        )
        .unwrap();
        assert!(body.access_token.is_none());
        assert_eq!(body.error.as_deref(), Some("bad_verification_code"));
    }
}
