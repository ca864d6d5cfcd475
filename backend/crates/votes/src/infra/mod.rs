pub mod postgres;

pub use postgres::PgVoteRepository;
