//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation_constraint;
use kernel::id::{AccountId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{account::Account, session::Session, user::User};
use crate::domain::repository::{AccountRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_password::UserPassword,
    username::Username,
};
use crate::error::{AuthError, AuthResult};

/// `UNIQUE (username)` on `users`
pub const USERS_USERNAME_CONSTRAINT: &str = "users_username_key";
/// `UNIQUE (email)` on `users`
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";
/// `UNIQUE (provider_id, provider_account_id)` on `accounts`
pub const ACCOUNTS_PROVIDER_CONSTRAINT: &str = "accounts_provider_key";

const USER_COLUMNS: &str = r#"
    user_id,
    public_id,
    username,
    name,
    email,
    email_verified,
    image,
    created_at,
    updated_at
"#;

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    user_id,
    provider_id,
    provider_account_id,
    password_hash,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

/// Turn a storage uniqueness rejection into the matching domain conflict
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    let conflict = match unique_violation_constraint(&err) {
        Some(USERS_USERNAME_CONSTRAINT) => Some(AuthError::username_taken()),
        Some(USERS_EMAIL_CONSTRAINT) => Some(AuthError::UserAlreadyExists),
        Some(ACCOUNTS_PROVIDER_CONSTRAINT) => Some(AuthError::AccountAlreadyLinked),
        _ => None,
    };
    conflict.unwrap_or(AuthError::Database(err))
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create_with_account(
        &self,
        user: &User,
        account: &Account,
        session: &Session,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                username,
                name,
                email,
                email_verified,
                image,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.username.original())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.email_verified)
        .bind(&user.image)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        insert_account(&mut *tx, account).await?;
        insert_session(&mut *tx, session).await?;

        // Dropping `tx` without commit rolls back on every error path above
        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

async fn insert_account<'e, E>(executor: E, account: &Account) -> AuthResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO accounts (
            account_id,
            user_id,
            provider_id,
            provider_account_id,
            password_hash,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(account.account_id.as_uuid())
    .bind(account.user_id.as_uuid())
    .bind(&account.provider_id)
    .bind(&account.provider_account_id)
    .bind(account.password_hash.as_ref().map(|h| h.as_phc_string()))
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(executor)
    .await
    .map_err(map_unique_violation)?;

    Ok(())
}

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        insert_account(&self.pool, account).await
    }

    async fn find_by_provider(
        &self,
        provider_id: &str,
        provider_account_id: &str,
    ) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE provider_id = $1 AND provider_account_id = $2"
        ))
        .bind(provider_id)
        .bind(provider_account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = $1 AND provider_id = 'credential'"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

async fn insert_session<'e, E>(executor: E, session: &Session) -> AuthResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO sessions (
            session_id,
            user_id,
            expires_at,
            ip_address,
            user_agent,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(session.session_id)
    .bind(session.user_id.as_uuid())
    .bind(session.expires_at)
    .bind(&session.ip_address)
    .bind(&session.user_agent)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        insert_session(&self.pool, session).await
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                expires_at,
                ip_address,
                user_agent,
                created_at,
                updated_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    username: String,
    name: String,
    email: String,
    email_verified: bool,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let public_id = PublicId::parse_str(&self.public_id)
            .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            username: Username::from_db(self.username),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            email_verified: self.email_verified,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    user_id: Uuid,
    provider_id: String,
    provider_account_id: String,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = self
            .password_hash
            .map(UserPassword::from_phc_string)
            .transpose()
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            user_id: UserId::from_uuid(self.user_id),
            provider_id: self.provider_id,
            provider_account_id: self.provider_account_id,
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Database(sqlx::Error::RowNotFound)));
    }
}
