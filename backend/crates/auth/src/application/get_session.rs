//! Get Session Use Case
//!
//! Resolves a session token to the live session and its user.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
    pub user: User,
}

pub struct GetSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> GetSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// `None` for a missing, forged, unknown or expired token
    pub async fn execute(&self, session_token: Option<&str>) -> AuthResult<Option<CurrentSession>> {
        let Some(session_id) = session_token
            .and_then(|token| session_token::verify(token, &self.config.session_secret).ok())
        else {
            return Ok(None);
        };

        let Some(session) = self.session_repo.find_by_id(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session removed");
            return Ok(None);
        }

        let Some(user) = self.user_repo.find_by_id(&session.user_id).await? else {
            return Ok(None);
        };

        Ok(Some(CurrentSession { session, user }))
    }
}
