//! HTTP Handlers

use std::sync::Arc;

use auth::middleware::AuthenticatedUser;
use axum::extract::State;
use axum::{Extension, Json};

use crate::application::CastVoteUseCase;
use crate::domain::repository::VoteRepository;
use crate::error::VoteResult;
use crate::presentation::dto::{CastVoteRequest, CastVoteResponse};

pub struct VotesAppState<R>
where
    R: VoteRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> Clone for VotesAppState<R>
where
    R: VoteRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// POST /
///
/// Requires `AuthenticatedUser`, inserted by the session middleware.
pub async fn cast_vote<R>(
    State(state): State<VotesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CastVoteRequest>,
) -> VoteResult<Json<CastVoteResponse>>
where
    R: VoteRepository + Send + Sync + 'static,
{
    let input = req.into_input(user.user_id)?;
    let outcome = CastVoteUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    Ok(Json(outcome.into()))
}
