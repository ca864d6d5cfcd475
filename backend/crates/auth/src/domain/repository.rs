//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{account::Account, session::Session, user::User};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user with its first account and first session in one transaction
    ///
    /// Uniqueness is enforced by storage: a taken username fails with
    /// `AuthError::UsernameAlreadyExists`, a taken email with
    /// `AuthError::UserAlreadyExists`, a provider account already linked
    /// elsewhere with `AuthError::AccountAlreadyLinked`. Nothing is persisted
    /// on failure.
    async fn create_with_account(
        &self,
        user: &User,
        account: &Account,
        session: &Session,
    ) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Exact match
    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;
}

#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Fails with `AuthError::AccountAlreadyLinked` if the provider account exists
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_provider(
        &self,
        provider_id: &str,
        provider_account_id: &str,
    ) -> AuthResult<Option<Account>>;

    /// The user's email/password account, if any
    async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Account>>;
}

#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn delete_expired(&self) -> AuthResult<u64>;
}
