//! Account Entity
//!
//! Links a user to one way of signing in: email/password (`credential`)
//! or an OAuth provider.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, UserId};

use crate::domain::value_object::{
    oauth_provider::{CREDENTIAL_PROVIDER_ID, OAuthProvider},
    user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub user_id: UserId,
    /// `credential`, `github` or `google`
    pub provider_id: String,
    /// The provider's stable user id; the user id for credential accounts
    pub provider_account_id: String,
    /// Only set for credential accounts
    pub password_hash: Option<UserPassword>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn credential(user_id: UserId, password_hash: UserPassword) -> Self {
        Self::build(
            user_id,
            CREDENTIAL_PROVIDER_ID.to_string(),
            user_id.to_string(),
            Some(password_hash),
        )
    }

    pub fn oauth(user_id: UserId, provider: OAuthProvider, provider_account_id: String) -> Self {
        Self::build(user_id, provider.id().to_string(), provider_account_id, None)
    }

    fn build(
        user_id: UserId,
        provider_id: String,
        provider_account_id: String,
        password_hash: Option<UserPassword>,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            user_id,
            provider_id,
            provider_account_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_credential(&self) -> bool {
        self.provider_id == CREDENTIAL_PROVIDER_ID
    }
}
