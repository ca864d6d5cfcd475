//! Votes Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Vote entity, target/vote type enums, repository trait
//! - `application/` - Cast-vote use case (create, toggle off, switch)
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! Every route requires a signed-in user; the auth crate's session
//! middleware is layered onto the router.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{VoteError, VoteResult};
pub use infra::postgres::PgVoteRepository;
pub use presentation::router::votes_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
