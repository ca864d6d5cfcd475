//! Auth Request Hooks
//!
//! `before` runs ahead of a request's side effects and may reject it.
//! `after` sees the error a request failed with and may replace it.
//! Both are keyed by [`AuthPath`]; a hook is inert on paths it doesn't handle.

use std::borrow::Cow;
use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::username::Username;
use crate::error::{AuthError, AuthResult};

/// Endpoints a hook can key on, relative to the auth mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPath {
    SignUpEmail,
    SignInEmail,
    SignInSocial,
    Callback,
    SignOut,
    GetSession,
}

impl AuthPath {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuthPath::SignUpEmail => "/sign-up/email",
            AuthPath::SignInEmail => "/sign-in/email",
            AuthPath::SignInSocial => "/sign-in/social",
            AuthPath::Callback => "/callback/{provider}",
            AuthPath::SignOut => "/sign-out",
            AuthPath::GetSession => "/get-session",
        }
    }
}

/// What a `before` hook gets to see of a request
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub path: AuthPath,
    pub username: Option<&'a Username>,
}

impl<'a> HookContext<'a> {
    pub fn new(path: AuthPath) -> Self {
        Self { path, username: None }
    }

    pub fn with_username(mut self, username: &'a Username) -> Self {
        self.username = Some(username);
        self
    }
}

#[trait_variant::make(AuthHook: Send)]
pub trait LocalAuthHook {
    async fn before(&self, ctx: &HookContext<'_>) -> AuthResult<()>;

    fn after(&self, path: AuthPath, err: AuthError) -> AuthError;
}

/// Runs `A` then `B`
#[derive(Debug, Clone, Default)]
pub struct HookChain<A, B>(pub A, pub B);

impl<A, B> AuthHook for HookChain<A, B>
where
    A: AuthHook + Sync,
    B: AuthHook + Sync,
{
    async fn before(&self, ctx: &HookContext<'_>) -> AuthResult<()> {
        self.0.before(ctx).await?;
        self.1.before(ctx).await
    }

    fn after(&self, path: AuthPath, err: AuthError) -> AuthError {
        self.1.after(path, self.0.after(path, err))
    }
}

/// No hooks
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl AuthHook for NoHooks {
    async fn before(&self, _ctx: &HookContext<'_>) -> AuthResult<()> {
        Ok(())
    }

    fn after(&self, _path: AuthPath, err: AuthError) -> AuthError {
        err
    }
}

/// Rejects a sign-up whose username is already registered
///
/// This gives an early, friendly error. The `users_username_key`
/// constraint still decides concurrent sign-ups.
pub struct UsernameUniquenessHook<U> {
    users: Arc<U>,
}

impl<U> UsernameUniquenessHook<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> Clone for UsernameUniquenessHook<U> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
        }
    }
}

impl<U> AuthHook for UsernameUniquenessHook<U>
where
    U: UserRepository + Send + Sync,
{
    async fn before(&self, ctx: &HookContext<'_>) -> AuthResult<()> {
        let (AuthPath::SignUpEmail, Some(username)) = (ctx.path, ctx.username) else {
            return Ok(());
        };

        if self.users.exists_by_username(username).await? {
            tracing::debug!(username = %username.as_str(), "Sign-up rejected: username taken");
            return Err(AuthError::username_taken());
        }
        Ok(())
    }

    fn after(&self, _path: AuthPath, err: AuthError) -> AuthError {
        err
    }
}

/// Rewrites sign-up conflicts into the codes and copy the forms expect
#[derive(Debug, Clone, Copy, Default)]
pub struct SignUpConflictRemapHook;

impl AuthHook for SignUpConflictRemapHook {
    async fn before(&self, _ctx: &HookContext<'_>) -> AuthResult<()> {
        Ok(())
    }

    fn after(&self, path: AuthPath, err: AuthError) -> AuthError {
        if path != AuthPath::SignUpEmail {
            return err;
        }
        match err {
            AuthError::UserAlreadyExists => AuthError::EmailAlreadyInUse,
            AuthError::UsernameAlreadyExists { .. } => AuthError::UsernameAlreadyExists {
                message: Cow::Borrowed("Username is taken."),
            },
            other => other,
        }
    }
}

/// The hooks the service runs in production
pub type DefaultHooks<U> = HookChain<UsernameUniquenessHook<U>, SignUpConflictRemapHook>;

pub fn default_hooks<U>(users: Arc<U>) -> DefaultHooks<U> {
    HookChain(UsernameUniquenessHook::new(users), SignUpConflictRemapHook)
}
