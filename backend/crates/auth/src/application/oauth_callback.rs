//! OAuth Callback Use Case
//!
//! Completes the authorization-code flow: verifies state, exchanges the code,
//! then finds, links or creates the user and signs them in.

use std::sync::Arc;

use platform::client::ClientInfo;
use rand::Rng;

use crate::application::config::AuthConfig;
use crate::application::oauth_state::OAuthState;
use crate::application::session::{self, IssuedSession};
use crate::application::social_sign_in::absolute_callback;
use crate::domain::entity::{account::Account, user::User};
use crate::domain::oauth::{OAuthClient, OAuthProfile};
use crate::domain::repository::{AccountRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, oauth_provider::OAuthProvider, username::Username,
};
use crate::error::{AuthError, AuthResult};

/// Candidates tried before giving up on a unique derived username
const USERNAME_ATTEMPTS: usize = 8;

pub struct OAuthCallbackInput {
    pub provider: String,
    pub code: Option<String>,
    pub state: Option<String>,
    /// `error` query parameter set by the provider on denial
    pub error: Option<String>,
    pub state_cookie: Option<String>,
}

#[derive(Debug)]
pub struct OAuthCallbackOutput {
    pub user: User,
    pub session: IssuedSession,
    pub redirect_to: String,
    pub new_user: bool,
}

pub struct OAuthCallbackUseCase<U, A, S, C>
where
    U: UserRepository,
    A: AccountRepository,
    S: SessionRepository,
    C: OAuthClient,
{
    user_repo: Arc<U>,
    account_repo: Arc<A>,
    session_repo: Arc<S>,
    oauth: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<U, A, S, C> OAuthCallbackUseCase<U, A, S, C>
where
    U: UserRepository,
    A: AccountRepository,
    S: SessionRepository,
    C: OAuthClient,
{
    pub fn new(
        user_repo: Arc<U>,
        account_repo: Arc<A>,
        session_repo: Arc<S>,
        oauth: Arc<C>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            account_repo,
            session_repo,
            oauth,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: OAuthCallbackInput,
        client: ClientInfo,
    ) -> AuthResult<OAuthCallbackOutput> {
        let provider: OAuthProvider = input
            .provider
            .parse()
            .map_err(|_| AuthError::UnsupportedProvider(input.provider.clone()))?;

        let state = input.state.as_deref().ok_or(AuthError::InvalidOAuthState)?;
        let state = OAuthState::verify(
            state,
            input.state_cookie.as_deref(),
            provider,
            &self.config.session_secret,
        )?;

        if let Some(error) = input.error {
            return Err(AuthError::OAuthExchange(format!("provider returned {error}")));
        }
        let code = input
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AuthError::OAuthExchange("missing authorization code".to_string()))?;

        let profile = self
            .oauth
            .exchange_code(provider, &code, &self.config.redirect_uri(provider))
            .await?;

        let (user, session, new_user) = match self.resolve_user(provider, profile, &client).await? {
            Resolved::Existing(user) => {
                let session =
                    session::issue(self.session_repo.as_ref(), &self.config, user.user_id, &client)
                        .await?;
                (user, session, false)
            }
            Resolved::Created(user, session) => (user, session, true),
        };

        tracing::info!(
            public_id = %user.public_id,
            provider = %provider,
            new_user,
            "User signed in with provider"
        );

        Ok(OAuthCallbackOutput {
            user,
            session,
            redirect_to: absolute_callback(&state.callback, &self.config.public_base_url),
            new_user,
        })
    }

    /// Existing account, else link by verified email, else a new user
    async fn resolve_user(
        &self,
        provider: OAuthProvider,
        profile: OAuthProfile,
        client: &ClientInfo,
    ) -> AuthResult<Resolved> {
        if let Some(user) = self.linked_user(provider, &profile.provider_account_id).await? {
            return Ok(Resolved::Existing(user));
        }

        let email = profile
            .email
            .as_deref()
            .and_then(|e| Email::parse(e).ok())
            .ok_or_else(|| AuthError::OAuthExchange("profile has no usable email".to_string()))?;

        if let Some(user) = self.user_repo.find_by_email(&email).await? {
            // Link only on a provider-verified address
            if !profile.email_verified {
                return Err(AuthError::AccountNotLinked);
            }

            let account =
                Account::oauth(user.user_id, provider, profile.provider_account_id.clone());
            return match self.account_repo.create(&account).await {
                Ok(()) => {
                    tracing::info!(public_id = %user.public_id, provider = %provider, "Provider linked");
                    Ok(Resolved::Existing(user))
                }
                Err(AuthError::AccountAlreadyLinked) => self
                    .linked_elsewhere(provider, &profile, AuthError::AccountAlreadyLinked)
                    .await
                    .map(Resolved::Existing),
                Err(e) => Err(e),
            };
        }

        self.create_user(provider, &profile, email, client).await
    }

    async fn linked_user(
        &self,
        provider: OAuthProvider,
        provider_account_id: &str,
    ) -> AuthResult<Option<User>> {
        let Some(account) = self
            .account_repo
            .find_by_provider(provider.id(), provider_account_id)
            .await?
        else {
            return Ok(None);
        };

        let user = self
            .user_repo
            .find_by_id(&account.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("account without user".to_string()))?;
        Ok(Some(user))
    }

    /// A concurrent callback for the same provider account won the insert
    async fn linked_elsewhere(
        &self,
        provider: OAuthProvider,
        profile: &OAuthProfile,
        otherwise: AuthError,
    ) -> AuthResult<User> {
        self.linked_user(provider, &profile.provider_account_id)
            .await?
            .ok_or(otherwise)
    }

    async fn create_user(
        &self,
        provider: OAuthProvider,
        profile: &OAuthProfile,
        email: Email,
        client: &ClientInfo,
    ) -> AuthResult<Resolved> {
        let name = DisplayName::from_profile(
            profile
                .name
                .as_deref()
                .or(profile.login.as_deref())
                .unwrap_or(email.local_part()),
        );
        let base = Username::derive_from(profile.username_hint());

        for attempt in 0..USERNAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.clone()
            } else {
                base.with_suffix(rand::rng().random_range(1..10_000))
            };
            if self.user_repo.exists_by_username(&candidate).await? {
                continue;
            }

            let user = User::new(candidate, name.clone(), email.clone())
                .with_verified_email(profile.email_verified)
                .with_image(profile.image.clone());
            let account = Account::oauth(user.user_id, provider, profile.provider_account_id.clone());
            let session = session::prepare(&self.config, user.user_id, client)?;

            match self
                .user_repo
                .create_with_account(&user, &account, &session.session)
                .await
            {
                Ok(()) => return Ok(Resolved::Created(user, session)),
                // Lost a race for this username
                Err(AuthError::UsernameAlreadyExists { .. }) => continue,
                // Lost a race against a callback for the same profile
                Err(err @ (AuthError::UserAlreadyExists | AuthError::AccountAlreadyLinked)) => {
                    return self
                        .linked_elsewhere(provider, profile, err)
                        .await
                        .map(Resolved::Existing);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AuthError::Internal(format!(
            "no free username derived from {:?}",
            base.as_str()
        )))
    }
}

enum Resolved {
    Existing(User),
    /// New user, signed in by the same transaction that created it
    Created(User, IssuedSession),
}
