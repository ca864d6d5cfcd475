//! Votes Router

use std::sync::Arc;

use auth::PgAuthRepository;
use auth::domain::repository::{SessionRepository, UserRepository};
use auth::middleware::{AuthMiddlewareState, require_auth_session};
use axum::{Router, middleware, routing::post};

use crate::domain::repository::VoteRepository;
use crate::infra::postgres::PgVoteRepository;
use crate::presentation::handlers::{self, VotesAppState};

/// Votes router on PostgreSQL, guarded by the auth session middleware
pub fn votes_router(repo: PgVoteRepository, auth: AuthMiddlewareState<PgAuthRepository>) -> Router {
    votes_router_generic(Arc::new(repo), auth)
}

/// Guarded votes router for any vote and session store
pub fn votes_router_generic<V, A>(repo: Arc<V>, auth: AuthMiddlewareState<A>) -> Router
where
    V: VoteRepository + Send + Sync + 'static,
    A: UserRepository + SessionRepository + Send + Sync + 'static,
{
    votes_routes(repo).route_layer(middleware::from_fn(move |req, next| {
        require_auth_session(auth.clone(), req, next)
    }))
}

/// Unguarded routes; callers must provide `AuthenticatedUser` themselves
pub fn votes_routes<V>(repo: Arc<V>) -> Router
where
    V: VoteRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(handlers::cast_vote::<V>))
        .with_state(VotesAppState { repo })
}
