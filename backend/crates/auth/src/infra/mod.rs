//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod oauth;
pub mod postgres;

pub use oauth::HttpOAuthClient;
pub use postgres::PgAuthRepository;
