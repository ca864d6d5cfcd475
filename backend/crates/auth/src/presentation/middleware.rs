//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;
use uuid::Uuid;

use crate::application::GetSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::public_id::PublicId;
use crate::error::AuthError;

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// The signed-in user, available to downstream handlers as an `Extension`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub public_id: PublicId,
    pub session_id: Uuid,
}

/// Middleware that requires a valid session cookie
///
/// Rejects with `401 UNAUTHORIZED` otherwise.
pub async fn require_auth_session<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + SessionRepository + Send + Sync + 'static,
{
    let token = state.config.session_cookie().read(req.headers());

    let use_case =
        GetSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let current = match use_case.execute(token.as_deref()).await {
        Ok(Some(current)) => current,
        Ok(None) => return Err(AuthError::SessionInvalid.into_response()),
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: current.user.user_id,
        public_id: current.user.public_id,
        session_id: current.session.session_id,
    });

    Ok(next.run(req).await)
}
