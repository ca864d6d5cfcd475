pub mod cast_vote;

pub use cast_vote::{CastVoteInput, CastVoteOutcome, CastVoteUseCase, VoteAction};
