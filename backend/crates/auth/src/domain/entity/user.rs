//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, username::Username,
};

#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    pub username: Username,
    pub name: DisplayName,
    pub email: Email,
    pub email_verified: bool,
    /// Avatar URL, from the identity provider for social accounts
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: Username, name: DisplayName, email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            username,
            name,
            email,
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Providers that confirm the address mark it verified
    pub fn with_verified_email(mut self, verified: bool) -> Self {
        self.email_verified = verified;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}
