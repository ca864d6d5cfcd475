pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::Vote;
pub use repository::VoteRepository;
pub use value_objects::{VoteTarget, VoteType};
