//! Session issuance shared by every sign-in path

use kernel::id::UserId;
use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// A persisted session and the signed token that refers to it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub token: String,
}

/// Build and sign a session without persisting it
pub(crate) fn prepare(
    config: &AuthConfig,
    user_id: UserId,
    client: &ClientInfo,
) -> AuthResult<IssuedSession> {
    let session = Session::new(user_id, client, config.session_ttl_chrono());
    let token = session_token::sign(session.session_id, &config.session_secret)?;
    Ok(IssuedSession { session, token })
}

pub(crate) async fn issue<S>(
    sessions: &S,
    config: &AuthConfig,
    user_id: UserId,
    client: &ClientInfo,
) -> AuthResult<IssuedSession>
where
    S: SessionRepository,
{
    let issued = prepare(config, user_id, client)?;
    sessions.create(&issued.session).await?;
    Ok(issued)
}
