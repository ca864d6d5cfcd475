//! Sign Up Use Case
//!
//! Creates a user with an email/password account and signs them in.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::hooks::{AuthHook, AuthPath, HookContext};
use crate::application::session::{self, IssuedSession};
use crate::domain::entity::{account::Account, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::validation::{SignUpForm, validate_sign_up};
use crate::domain::value_object::user_password::UserPassword;
use crate::error::AuthResult;

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    pub session: IssuedSession,
}

/// Sign up use case
pub struct SignUpUseCase<U, H>
where
    U: UserRepository,
    H: AuthHook,
{
    user_repo: Arc<U>,
    hooks: Arc<H>,
    config: Arc<AuthConfig>,
}

impl<U, H> SignUpUseCase<U, H>
where
    U: UserRepository,
    H: AuthHook,
{
    pub fn new(user_repo: Arc<U>, hooks: Arc<H>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            hooks,
            config,
        }
    }

    /// Post-hooks see every failure, including validation
    pub async fn execute(&self, form: SignUpForm, client: ClientInfo) -> AuthResult<SignUpOutput> {
        self.run(form, client)
            .await
            .map_err(|err| self.hooks.after(AuthPath::SignUpEmail, err))
    }

    async fn run(&self, form: SignUpForm, client: ClientInfo) -> AuthResult<SignUpOutput> {
        let input = validate_sign_up(&form)?;

        self.hooks
            .before(&HookContext::new(AuthPath::SignUpEmail).with_username(&input.username))
            .await?;

        let password_hash = UserPassword::from_raw(&input.password, self.config.pepper())?;

        let user = User::new(input.username, input.name, input.email);
        let account = Account::credential(user.user_id, password_hash);
        let session = session::prepare(&self.config, user.user_id, &client)?;

        // Uniqueness of username and email is decided here, atomically, and a
        // user never exists without the session that signed them up
        self.user_repo
            .create_with_account(&user, &account, &session.session)
            .await?;

        tracing::info!(
            public_id = %user.public_id,
            username = %user.username,
            "User signed up"
        );

        Ok(SignUpOutput { user, session })
    }
}
