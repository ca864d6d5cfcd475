//! Repository Traits

use kernel::id::{UserId, VoteId};
use uuid::Uuid;

use crate::domain::entities::Vote;
use crate::domain::value_objects::{VoteTarget, VoteType};
use crate::error::VoteResult;

#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    async fn find(
        &self,
        author: &UserId,
        target_id: Uuid,
        target_type: VoteTarget,
    ) -> VoteResult<Option<Vote>>;

    /// Fails with `VoteError::Conflict` if the author already voted on the target
    async fn create(&self, vote: &Vote) -> VoteResult<()>;

    async fn update_type(&self, vote_id: &VoteId, vote_type: VoteType) -> VoteResult<()>;

    async fn delete(&self, vote_id: &VoteId) -> VoteResult<()>;
}
