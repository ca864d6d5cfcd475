//! Sign In Use Case
//!
//! Authenticates a user by email and password and creates a session.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::session::{self, IssuedSession};
use crate::domain::entity::user::User;
use crate::domain::repository::{AccountRepository, SessionRepository, UserRepository};
use crate::domain::validation::{SignInForm, validate_sign_in};
use crate::error::{AuthError, AuthResult};

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Sign in use case
pub struct SignInUseCase<U, A, S>
where
    U: UserRepository,
    A: AccountRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    account_repo: Arc<A>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, A, S> SignInUseCase<U, A, S>
where
    U: UserRepository,
    A: AccountRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        account_repo: Arc<A>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            account_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, form: SignInForm, client: ClientInfo) -> AuthResult<SignInOutput> {
        let input = validate_sign_in(&form)?;

        // Unknown email, social-only user and wrong password look the same
        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidEmailOrPassword)?;

        let password_hash = self
            .account_repo
            .find_credential(&user.user_id)
            .await?
            .and_then(|account| account.password_hash)
            .ok_or(AuthError::InvalidEmailOrPassword)?;

        if !password_hash.verify(&input.password, self.config.pepper()) {
            return Err(AuthError::InvalidEmailOrPassword);
        }

        let session =
            session::issue(self.session_repo.as_ref(), &self.config, user.user_id, &client).await?;

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session.session_id,
            "User signed in"
        );

        Ok(SignInOutput { user, session })
    }
}
