//! Vote Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use thiserror::Error;

pub type VoteResult<T> = Result<T, VoteError>;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const VOTE_CONFLICT: &str = "VOTE_CONFLICT";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// A concurrent cast for the same author and target won the insert
    #[error("Vote changed concurrently. Please try again.")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::Validation(_) => ErrorKind::BadRequest,
            VoteError::Conflict => ErrorKind::Conflict,
            VoteError::Database(_) | VoteError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn code(&self) -> &'static str {
        match self {
            VoteError::Validation(_) => VALIDATION_ERROR,
            VoteError::Conflict => VOTE_CONFLICT,
            VoteError::Database(_) | VoteError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            VoteError::Validation(fields) => AppError::from(fields.clone()),
            VoteError::Database(_) | VoteError::Internal(_) => {
                AppError::internal("Internal server error").with_code(self.code())
            }
            _ => AppError::new(self.kind(), self.to_string()).with_code(self.code()),
        }
    }

    pub fn log(&self) {
        match self {
            VoteError::Database(e) => tracing::error!(error = %e, "Votes database error"),
            VoteError::Internal(msg) => tracing::error!(message = %msg, "Votes internal error"),
            _ => tracing::debug!(code = self.code(), error = %self, "Vote error"),
        }
    }
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<FieldErrors> for VoteError {
    fn from(errors: FieldErrors) -> Self {
        VoteError::Validation(errors)
    }
}
