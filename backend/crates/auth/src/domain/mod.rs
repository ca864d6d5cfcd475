//! Domain Layer
//!
//! Contains entities, value objects, input validation and repository traits.

pub mod entity;
pub mod oauth;
pub mod repository;
pub mod validation;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, session::Session, user::User};
pub use oauth::{OAuthClient, OAuthProfile};
pub use repository::{AccountRepository, SessionRepository, UserRepository};
