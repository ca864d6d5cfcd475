//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation_constraint;
use kernel::id::{UserId, VoteId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Vote;
use crate::domain::repository::VoteRepository;
use crate::domain::value_objects::{VoteTarget, VoteType};
use crate::error::{VoteError, VoteResult};

/// `UNIQUE (author_id, target_id, target_type)` on `votes`
pub const VOTES_AUTHOR_TARGET_CONSTRAINT: &str = "votes_author_target_key";

const VOTE_COLUMNS: &str = r#"
    vote_id,
    author_id,
    target_id,
    target_type,
    vote_type,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> VoteError {
    match unique_violation_constraint(&err) {
        Some(VOTES_AUTHOR_TARGET_CONSTRAINT) => VoteError::Conflict,
        _ => VoteError::Database(err),
    }
}

impl VoteRepository for PgVoteRepository {
    async fn find(
        &self,
        author: &UserId,
        target_id: Uuid,
        target_type: VoteTarget,
    ) -> VoteResult<Option<Vote>> {
        let row = sqlx::query_as::<_, VoteRow>(&format!(
            "SELECT {VOTE_COLUMNS} FROM votes \
             WHERE author_id = $1 AND target_id = $2 AND target_type = $3"
        ))
        .bind(author.as_uuid())
        .bind(target_id)
        .bind(target_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteRow::into_vote).transpose()
    }

    async fn create(&self, vote: &Vote) -> VoteResult<()> {
        sqlx::query(
            r#"
            INSERT INTO votes (
                vote_id,
                author_id,
                target_id,
                target_type,
                vote_type,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(vote.vote_id.as_uuid())
        .bind(vote.author.as_uuid())
        .bind(vote.target_id)
        .bind(vote.target_type.as_str())
        .bind(vote.vote_type.as_str())
        .bind(vote.created_at)
        .bind(vote.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn update_type(&self, vote_id: &VoteId, vote_type: VoteType) -> VoteResult<()> {
        sqlx::query("UPDATE votes SET vote_type = $2, updated_at = $3 WHERE vote_id = $1")
            .bind(vote_id.as_uuid())
            .bind(vote_type.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, vote_id: &VoteId) -> VoteResult<()> {
        sqlx::query("DELETE FROM votes WHERE vote_id = $1")
            .bind(vote_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct VoteRow {
    vote_id: Uuid,
    author_id: Uuid,
    target_id: Uuid,
    target_type: String,
    vote_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_vote(self) -> VoteResult<Vote> {
        let target_type = self
            .target_type
            .parse()
            .map_err(|e: &str| VoteError::Internal(e.to_string()))?;
        let vote_type = self
            .vote_type
            .parse()
            .map_err(|e: &str| VoteError::Internal(e.to_string()))?;

        Ok(Vote {
            vote_id: VoteId::from_uuid(self.vote_id),
            author: UserId::from_uuid(self.author_id),
            target_id: self.target_id,
            target_type,
            vote_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
