pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::VotesAppState;
pub use router::{votes_router, votes_router_generic, votes_routes};
