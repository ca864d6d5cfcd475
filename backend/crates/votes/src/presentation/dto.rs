//! API DTOs (Data Transfer Objects)

use kernel::id::UserId;
use kernel::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{CastVoteInput, CastVoteOutcome, VoteAction};
use crate::domain::value_objects::{VoteTarget, VoteType};

/// Cast vote request
///
/// Fields stay strings so a bad value is reported per field rather than as a
/// body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CastVoteRequest {
    pub target_id: String,
    pub target_type: String,
    pub vote_type: String,
}

impl CastVoteRequest {
    pub fn into_input(self, author: UserId) -> Result<CastVoteInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let target_id = errors.collect(
            "targetId",
            Uuid::parse_str(self.target_id.trim()).map_err(|_| vec!["Target id must be a UUID."]),
        );
        let target_type = errors.collect(
            "targetType",
            self.target_type.parse::<VoteTarget>().map_err(|e| vec![e]),
        );
        let vote_type = errors.collect(
            "voteType",
            self.vote_type.parse::<VoteType>().map_err(|e| vec![e]),
        );

        match (target_id, target_type, vote_type) {
            (Some(target_id), Some(target_type), Some(vote_type)) => Ok(CastVoteInput {
                author,
                target_id,
                target_type,
                vote_type,
            }),
            _ => Err(errors),
        }
    }
}

/// `{ action, voteType? }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub action: VoteAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_type: Option<VoteType>,
}

impl From<CastVoteOutcome> for CastVoteResponse {
    fn from(outcome: CastVoteOutcome) -> Self {
        Self {
            action: outcome.action(),
            vote_type: outcome.vote_type(),
        }
    }
}
