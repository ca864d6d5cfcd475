//! Cast Vote Use Case
//!
//! One vote per author and target. Casting the same type again removes the
//! vote; casting the other type switches it.

use std::sync::Arc;

use kernel::id::UserId;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Vote;
use crate::domain::repository::VoteRepository;
use crate::domain::value_objects::{VoteTarget, VoteType};
use crate::error::VoteResult;

#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub author: UserId,
    pub target_id: Uuid,
    pub target_type: VoteTarget,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Created,
    Removed,
    Switched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastVoteOutcome {
    Created(VoteType),
    Removed,
    Switched(VoteType),
}

impl CastVoteOutcome {
    pub fn action(&self) -> VoteAction {
        match self {
            CastVoteOutcome::Created(_) => VoteAction::Created,
            CastVoteOutcome::Removed => VoteAction::Removed,
            CastVoteOutcome::Switched(_) => VoteAction::Switched,
        }
    }

    /// The author's vote after the cast, `None` once removed
    pub fn vote_type(&self) -> Option<VoteType> {
        match self {
            CastVoteOutcome::Created(t) | CastVoteOutcome::Switched(t) => Some(*t),
            CastVoteOutcome::Removed => None,
        }
    }
}

pub struct CastVoteUseCase<R>
where
    R: VoteRepository,
{
    repo: Arc<R>,
}

impl<R> CastVoteUseCase<R>
where
    R: VoteRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CastVoteInput) -> VoteResult<CastVoteOutcome> {
        let existing = self
            .repo
            .find(&input.author, input.target_id, input.target_type)
            .await?;

        let outcome = match existing {
            None => {
                let vote = Vote::new(
                    input.author,
                    input.target_id,
                    input.target_type,
                    input.vote_type,
                );
                self.repo.create(&vote).await?;
                CastVoteOutcome::Created(input.vote_type)
            }
            Some(vote) if vote.vote_type == input.vote_type => {
                self.repo.delete(&vote.vote_id).await?;
                CastVoteOutcome::Removed
            }
            Some(mut vote) => {
                vote.switch_to(input.vote_type);
                self.repo.update_type(&vote.vote_id, vote.vote_type).await?;
                CastVoteOutcome::Switched(input.vote_type)
            }
        };

        tracing::info!(
            author = %input.author,
            target_id = %input.target_id,
            target_type = %input.target_type,
            action = ?outcome.action(),
            "Vote cast"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(CastVoteOutcome::Created(VoteType::Upvote).action(), VoteAction::Created);
        assert_eq!(
            CastVoteOutcome::Switched(VoteType::Downvote).vote_type(),
            Some(VoteType::Downvote)
        );
        assert_eq!(CastVoteOutcome::Removed.vote_type(), None);
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(serde_json::to_value(VoteAction::Switched).unwrap(), "switched");
    }
}
