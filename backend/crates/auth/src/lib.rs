//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, validation, repository traits
//! - `application/` - Use cases, request hooks, session and OAuth state tokens
//! - `infra/` - PostgreSQL repository and identity provider client
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email/password sign-up and sign-in
//! - Social sign-in with GitHub and Google (authorization-code flow)
//! - Server-side sessions with signed cookie tokens
//! - Sign-up hooks: early username check, conflict remapping
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Username and email uniqueness enforced by database constraints
//! - OAuth state HMAC-signed, bound to a cookie, 10 minute lifetime
//! - Callback URLs restricted to the frontend origin

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod hooks {
    pub use crate::application::hooks::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
