//! Auth Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::oauth::OAuthClient;
use crate::error::AuthResult;
use crate::infra::{oauth::HttpOAuthClient, postgres::PgAuthRepository};
use crate::presentation::handlers::{self, AuthAppState, AuthStore};

/// Create the Auth router with the PostgreSQL repository and HTTP identity providers
pub fn auth_router(repo: PgAuthRepository, config: Arc<AuthConfig>) -> AuthResult<Router> {
    let oauth = HttpOAuthClient::new(config.clone())?;
    Ok(auth_router_generic(Arc::new(repo), Arc::new(oauth), config))
}

/// Create a generic Auth router for any repository and provider client
pub fn auth_router_generic<R, C>(repo: Arc<R>, oauth: Arc<C>, config: Arc<AuthConfig>) -> Router
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, oauth, config);

    Router::new()
        .route("/sign-up/email", post(handlers::sign_up::<R, C>))
        .route("/sign-in/email", post(handlers::sign_in::<R, C>))
        .route("/sign-in/social", post(handlers::sign_in_social::<R, C>))
        .route("/callback/{provider}", get(handlers::oauth_callback::<R, C>))
        .route("/sign-out", post(handlers::sign_out::<R, C>))
        .route("/get-session", get(handlers::get_session::<R, C>))
        .with_state(state)
}
