//! Session Entity
//!
//! Server-side session. The client only holds a signed reference to
//! `session_id` (see `application::session_token`).

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::client::ClientInfo;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// TTL comes from `AuthConfig`
    pub fn new(user_id: UserId, client: &ClientInfo, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            expires_at: now + ttl,
            ip_address: client.ip_string(),
            user_agent: client.user_agent.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime in whole seconds, never negative
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expiry() {
        let session = Session::new(UserId::new(), &ClientInfo::default(), Duration::days(7));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
        assert!(session.remaining_secs() > 6 * 24 * 3600);
    }

    #[test]
    fn test_client_info_is_recorded() {
        let client = ClientInfo {
            ip: "10.0.0.1".parse().ok(),
            user_agent: Some("curl/8".to_string()),
        };
        let session = Session::new(UserId::new(), &client, Duration::hours(1));
        assert_eq!(session.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(session.user_agent.as_deref(), Some("curl/8"));
    }
}
