//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{UserId, VoteId};
use uuid::Uuid;

use super::value_objects::{VoteTarget, VoteType};

/// One user's vote on one question or answer
///
/// `(author, target_id, target_type)` is unique.
#[derive(Debug, Clone)]
pub struct Vote {
    pub vote_id: VoteId,
    pub author: UserId,
    pub target_id: Uuid,
    pub target_type: VoteTarget,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(author: UserId, target_id: Uuid, target_type: VoteTarget, vote_type: VoteType) -> Self {
        let now = Utc::now();
        Self {
            vote_id: VoteId::new(),
            author,
            target_id,
            target_type,
            vote_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn switch_to(&mut self, vote_type: VoteType) {
        self.vote_type = vote_type;
        self.updated_at = Utc::now();
    }
}
