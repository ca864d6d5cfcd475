//! Domain Value Objects
//!
//! Closed enumerations for what can be voted on and how. The same sets are
//! enforced by `CHECK` constraints on the `votes` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteTarget {
    Question,
    Answer,
}

impl VoteTarget {
    pub const ALL: [VoteTarget; 2] = [VoteTarget::Question, VoteTarget::Answer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            VoteTarget::Question => "question",
            VoteTarget::Answer => "answer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub const ALL: [VoteType; 2] = [VoteType::Upvote, VoteType::Downvote];

    pub const fn as_str(&self) -> &'static str {
        match self {
            VoteType::Upvote => "upvote",
            VoteType::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const INVALID_TARGET_TYPE: &str = "Target type must be \"question\" or \"answer\".";
pub const INVALID_VOTE_TYPE: &str = "Vote type must be \"upvote\" or \"downvote\".";

impl FromStr for VoteTarget {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(INVALID_TARGET_TYPE)
    }
}

impl FromStr for VoteType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(INVALID_VOTE_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("question".parse(), Ok(VoteTarget::Question));
        assert_eq!("answer".parse(), Ok(VoteTarget::Answer));
        assert_eq!("Question".parse::<VoteTarget>(), Err(INVALID_TARGET_TYPE));
        assert_eq!("comment".parse::<VoteTarget>(), Err(INVALID_TARGET_TYPE));

        assert_eq!("downvote".parse(), Ok(VoteType::Downvote));
        assert_eq!("like".parse::<VoteType>(), Err(INVALID_VOTE_TYPE));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_value(VoteType::Upvote).unwrap(), "upvote");
        let target: VoteTarget = serde_json::from_value(serde_json::json!("answer")).unwrap();
        assert_eq!(target, VoteTarget::Answer);
    }
}
