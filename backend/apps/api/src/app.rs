//! Router Assembly

use std::sync::Arc;

use auth::PgAuthRepository;
use auth::middleware::AuthMiddlewareState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, routing::get};
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use votes::{PgVoteRepository, votes_router};

use crate::config::ApiConfig;

/// Full application router over one shared pool
pub fn build_router(pool: PgPool, config: &ApiConfig) -> anyhow::Result<Router> {
    let auth_config = Arc::new(config.auth.clone());
    let auth_repo = PgAuthRepository::new(pool.clone());

    let session_guard = AuthMiddlewareState::new(Arc::new(auth_repo.clone()), auth_config.clone());

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::auth_router(auth_repo, auth_config)?)
        .nest(
            "/api/votes",
            votes_router(PgVoteRepository::new(pool), session_guard),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors(&config.frontend_origins));

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
