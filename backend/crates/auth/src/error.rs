//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Clients branch on [`AuthError::code`].

use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

pub const USERNAME_ALREADY_EXISTS: &str = "USERNAME_ALREADY_EXISTS";
pub const USER_ALREADY_EXISTS: &str = "USER_ALREADY_EXISTS";
pub const USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL: &str = "USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INVALID_EMAIL_OR_PASSWORD: &str = "INVALID_EMAIL_OR_PASSWORD";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const PROVIDER_NOT_FOUND: &str = "PROVIDER_NOT_FOUND";
pub const INVALID_OAUTH_STATE: &str = "INVALID_OAUTH_STATE";
pub const OAUTH_EXCHANGE_FAILED: &str = "OAUTH_EXCHANGE_FAILED";
pub const ACCOUNT_NOT_LINKED: &str = "ACCOUNT_NOT_LINKED";
pub const ACCOUNT_ALREADY_LINKED: &str = "ACCOUNT_ALREADY_LINKED";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed field validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Username taken (pre-check or `users.username` constraint)
    #[error("{message}")]
    UsernameAlreadyExists { message: Cow<'static, str> },

    /// Email taken, as reported by storage
    #[error("User already exists")]
    UserAlreadyExists,

    /// Email taken, after sign-up error remapping
    #[error("Email already in use.")]
    EmailAlreadyInUse,

    /// Unknown email, wrong password, or no credential account
    #[error("Invalid email or password")]
    InvalidEmailOrPassword,

    /// Session missing, expired, or token signature invalid
    #[error("Unauthorized")]
    SessionInvalid,

    #[error("Provider not found: {0}")]
    UnsupportedProvider(String),

    /// OAuth state missing, tampered, expired, or not matching the cookie
    #[error("Invalid OAuth state")]
    InvalidOAuthState,

    /// Identity provider rejected the code or returned an unusable profile
    #[error("OAuth exchange failed: {0}")]
    OAuthExchange(String),

    /// Provider email matches a user but the provider did not verify it
    #[error("Sign in with your existing method to link this account")]
    AccountNotLinked,

    /// Provider account already belongs to a user (`accounts_provider_key`)
    #[error("Provider account already linked")]
    AccountAlreadyLinked,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Username conflict with the default pre-check message
    pub fn username_taken() -> Self {
        AuthError::UsernameAlreadyExists {
            message: Cow::Borrowed("Username already taken"),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::UnsupportedProvider(_)
            | AuthError::InvalidOAuthState => ErrorKind::BadRequest,
            AuthError::UsernameAlreadyExists { .. }
            | AuthError::UserAlreadyExists
            | AuthError::EmailAlreadyInUse
            | AuthError::AccountAlreadyLinked => ErrorKind::Conflict,
            AuthError::InvalidEmailOrPassword
            | AuthError::SessionInvalid
            | AuthError::AccountNotLinked => ErrorKind::Unauthorized,
            AuthError::OAuthExchange(_) => ErrorKind::BadGateway,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => VALIDATION_ERROR,
            AuthError::UsernameAlreadyExists { .. } => USERNAME_ALREADY_EXISTS,
            AuthError::UserAlreadyExists => USER_ALREADY_EXISTS,
            AuthError::EmailAlreadyInUse => USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL,
            AuthError::InvalidEmailOrPassword => INVALID_EMAIL_OR_PASSWORD,
            AuthError::SessionInvalid => UNAUTHORIZED,
            AuthError::UnsupportedProvider(_) => PROVIDER_NOT_FOUND,
            AuthError::InvalidOAuthState => INVALID_OAUTH_STATE,
            AuthError::OAuthExchange(_) => OAUTH_EXCHANGE_FAILED,
            AuthError::AccountNotLinked => ACCOUNT_NOT_LINKED,
            AuthError::AccountAlreadyLinked => ACCOUNT_ALREADY_LINKED,
            AuthError::Database(_) | AuthError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; server faults never leak their cause
    pub fn client_message(&self) -> Cow<'static, str> {
        match self {
            AuthError::Database(_) | AuthError::Internal(_) => {
                Cow::Borrowed("Internal server error")
            }
            AuthError::OAuthExchange(_) => Cow::Borrowed("Could not complete social sign-in"),
            AuthError::UsernameAlreadyExists { message } => message.clone(),
            other => Cow::Owned(other.to_string()),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(fields) => AppError::from(fields.clone()),
            _ => AppError::new(self.kind(), self.client_message()).with_code(self.code()),
        }
    }

    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::OAuthExchange(msg) => {
                tracing::warn!(message = %msg, "OAuth exchange failed");
            }
            AuthError::InvalidEmailOrPassword => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::InvalidOAuthState => {
                tracing::warn!("OAuth state rejected");
            }
            AuthError::AccountNotLinked => {
                tracing::warn!("Unverified provider email matches an existing user");
            }
            _ => {
                tracing::debug!(code = self.code(), error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<FieldErrors> for AuthError {
    fn from(errors: FieldErrors) -> Self {
        AuthError::Validation(errors)
    }
}
