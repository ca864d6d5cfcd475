//! HTTP Handlers

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, FromRequestParts, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::hooks::{DefaultHooks, default_hooks};
use crate::application::{
    GetSessionUseCase, IssuedSession, OAuthCallbackInput, OAuthCallbackUseCase, SignInUseCase,
    SignOutUseCase, SignUpUseCase, SocialSignInInput, SocialSignInUseCase,
};
use crate::domain::oauth::OAuthClient;
use crate::domain::repository::{AccountRepository, SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, CallbackQuery, SessionInfo, SessionResponse, SignInRequest, SignOutResponse,
    SignUpRequest, SocialSignInRequest, SocialSignInResponse, UserResponse,
};

/// Everything the auth handlers persist through
pub trait AuthStore:
    UserRepository + AccountRepository + SessionRepository + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + AccountRepository + SessionRepository + Send + Sync + 'static
{
}

/// Shared state for auth handlers
pub struct AuthAppState<R, C>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub hooks: Arc<DefaultHooks<R>>,
    pub oauth: Arc<C>,
    pub config: Arc<AuthConfig>,
}

impl<R, C> AuthAppState<R, C>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, oauth: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            hooks: Arc::new(default_hooks(repo.clone())),
            repo,
            oauth,
            config,
        }
    }
}

impl<R, C> Clone for AuthAppState<R, C>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            hooks: self.hooks.clone(),
            oauth: self.oauth.clone(),
            config: self.config.clone(),
        }
    }
}

/// Caller IP and User-Agent, recorded on new sessions
pub struct Client(pub ClientInfo);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Client(ClientInfo::from_headers(&parts.headers, direct_ip)))
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/sign-up/email
pub async fn sign_up<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Client(client): Client,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Response>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.hooks.clone(), state.config.clone());

    let output = use_case.execute(req.into(), client).await?;

    session_response(&state.config, output.session, UserResponse::from(&output.user))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/sign-in/email
pub async fn sign_in<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Client(client): Client,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Response>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.into(), client).await?;

    session_response(&state.config, output.session, UserResponse::from(&output.user))
}

// ============================================================================
// Social Sign In
// ============================================================================

/// POST /api/auth/sign-in/social
pub async fn sign_in_social<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Json(req): Json<SocialSignInRequest>,
) -> AuthResult<Response>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let output = SocialSignInUseCase::new(state.config.clone()).execute(SocialSignInInput {
        provider: req.provider,
        callback_url: req.callback_url,
    })?;

    let cookie = header_value(state.config.oauth_state_cookie().set_header(&output.state))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SocialSignInResponse {
            url: output.url,
            redirect: true,
        }),
    )
        .into_response())
}

/// GET /api/auth/callback/{provider}
pub async fn oauth_callback<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    Client(client): Client,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let state_cookie = state.config.oauth_state_cookie();

    let use_case = OAuthCallbackUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.oauth.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            OAuthCallbackInput {
                provider,
                code: query.code,
                state: query.state,
                error: query.error,
                state_cookie: state_cookie.read(&headers),
            },
            client,
        )
        .await?;

    let session_cookie =
        header_value(state.config.session_cookie().set_header(&output.session.token))?;
    let clear_state = header_value(state_cookie.delete_header())?;

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, clear_state),
        ]),
        Redirect::to(&output.redirect_to),
    )
        .into_response())
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/sign-out
pub async fn sign_out<R, C>(
    State(state): State<AuthAppState<R, C>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let cookie_config = state.config.session_cookie();
    let token = cookie_config.read(&headers);

    let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
    // The cookie is cleared even if the session row could not be removed
    if let Err(e) = use_case.execute(token.as_deref()).await {
        e.log();
    }

    let cookie = header_value(cookie_config.delete_header())?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignOutResponse { success: true }),
    )
        .into_response())
}

// ============================================================================
// Get Session
// ============================================================================

/// GET /api/auth/get-session
pub async fn get_session<R, C>(
    State(state): State<AuthAppState<R, C>>,
    headers: HeaderMap,
) -> AuthResult<Json<Option<SessionResponse>>>
where
    R: AuthStore,
    C: OAuthClient + Send + Sync + 'static,
{
    let token = state.config.session_cookie().read(&headers);

    let use_case =
        GetSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let current = use_case.execute(token.as_deref()).await?;

    Ok(Json(current.map(|c| SessionResponse {
        session: SessionInfo::from(&c.session),
        user: UserResponse::from(&c.user),
    })))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_response(
    config: &AuthConfig,
    session: IssuedSession,
    user: UserResponse,
) -> AuthResult<Response> {
    let cookie = header_value(config.session_cookie().set_header(&session.token))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            token: session.token,
            user,
        }),
    )
        .into_response())
}

fn header_value(
    value: Result<HeaderValue, header::InvalidHeaderValue>,
) -> AuthResult<HeaderValue> {
    value.map_err(|e| AuthError::Internal(format!("invalid Set-Cookie value: {e}")))
}
