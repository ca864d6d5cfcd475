//! Crate-level tests for Auth
//! In-memory repository and canned identity provider; HTTP flows run through the router

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use kernel::id::UserId;
    use uuid::Uuid;

    use crate::application::config::{AuthConfig, OAuthProviderConfig};
    use crate::domain::entity::{account::Account, session::Session, user::User};
    use crate::domain::oauth::{OAuthClient, OAuthProfile};
    use crate::domain::repository::{AccountRepository, SessionRepository, UserRepository};
    use crate::domain::value_object::{
        email::Email, oauth_provider::OAuthProvider, username::Username,
    };
    use crate::error::{AuthError, AuthResult};
    use crate::presentation::router::auth_router_generic;

    /// Enforces the same uniqueness as the table constraints
    #[derive(Default)]
    pub struct MemoryStore {
        pub users: Mutex<Vec<User>>,
        pub accounts: Mutex<Vec<Account>>,
        pub sessions: Mutex<HashMap<Uuid, Session>>,
        /// Next provider lookup misses, as if a concurrent insert had not landed yet
        pub stale_provider_lookup: AtomicBool,
    }

    impl MemoryStore {
        fn check_account(accounts: &[Account], account: &Account) -> AuthResult<()> {
            if accounts.iter().any(|a| {
                a.provider_id == account.provider_id
                    && a.provider_account_id == account.provider_account_id
            }) {
                return Err(AuthError::AccountAlreadyLinked);
            }
            Ok(())
        }

        pub fn sessions_for(&self, user_id: &UserId) -> usize {
            self.sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| &s.user_id == user_id)
                .count()
        }

        pub fn accounts_for(&self, user_id: &UserId) -> Vec<Account> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .filter(|a| &a.user_id == user_id)
                .cloned()
                .collect()
        }

        pub fn user_by_email(&self, email: &str) -> User {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.as_str() == email)
                .cloned()
                .expect("user with that email")
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn account_count(&self) -> usize {
            self.accounts.lock().unwrap().len()
        }

        pub fn session_count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    impl UserRepository for MemoryStore {
        async fn create_with_account(
            &self,
            user: &User,
            account: &Account,
            session: &Session,
        ) -> AuthResult<()> {
            let mut users = self.users.lock().unwrap();
            let mut accounts = self.accounts.lock().unwrap();
            if users.iter().any(|u| u.username == user.username) {
                return Err(AuthError::username_taken());
            }
            if users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::UserAlreadyExists);
            }
            Self::check_account(&accounts, account)?;
            users.push(user.clone());
            accounts.push(account.clone());
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id, session.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.user_id == user_id).cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.email == email).cloned())
        }

        async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().any(|u| &u.username == username))
        }
    }

    impl AccountRepository for MemoryStore {
        async fn create(&self, account: &Account) -> AuthResult<()> {
            let mut accounts = self.accounts.lock().unwrap();
            Self::check_account(&accounts, account)?;
            accounts.push(account.clone());
            Ok(())
        }

        async fn find_by_provider(
            &self,
            provider_id: &str,
            provider_account_id: &str,
        ) -> AuthResult<Option<Account>> {
            if self.stale_provider_lookup.swap(false, Ordering::SeqCst) {
                return Ok(None);
            }
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts
                .iter()
                .find(|a| a.provider_id == provider_id && a.provider_account_id == provider_account_id)
                .cloned())
        }

        async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Account>> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts
                .iter()
                .find(|a| &a.user_id == user_id && a.is_credential())
                .cloned())
        }
    }

    impl SessionRepository for MemoryStore {
        async fn create(&self, session: &Session) -> AuthResult<()> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id, session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<Session>> {
            Ok(self.sessions.lock().unwrap().get(&session_id).cloned())
        }

        async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
            self.sessions.lock().unwrap().remove(&session_id);
            Ok(())
        }

        async fn delete_expired(&self) -> AuthResult<u64> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired());
            Ok((before - sessions.len()) as u64)
        }
    }

    /// Returns `profile` for any code except `"bad"`
    pub struct FakeOAuth {
        pub profile: OAuthProfile,
    }

    impl OAuthClient for FakeOAuth {
        async fn exchange_code(
            &self,
            _provider: OAuthProvider,
            code: &str,
            _redirect_uri: &str,
        ) -> AuthResult<OAuthProfile> {
            if code == "bad" {
                return Err(AuthError::OAuthExchange("bad_verification_code".to_string()));
            }
            Ok(self.profile.clone())
        }
    }

    pub fn octocat() -> OAuthProfile {
        OAuthProfile {
            provider_account_id: "583231".to_string(),
            email: Some("octocat@github.com".to_string()),
            email_verified: true,
            name: Some("The Octocat".to_string()),
            login: Some("octocat".to_string()),
            image: Some("https://avatars.githubusercontent.com/u/583231".to_string()),
        }
    }

    pub fn test_config() -> Arc<AuthConfig> {
        Arc::new(
            AuthConfig::development()
                .with_provider(OAuthProviderConfig::github("gh-id", "gh-secret"))
                .with_provider(OAuthProviderConfig::google("g-id", "g-secret")),
        )
    }

    pub struct TestApp {
        pub router: Router,
        pub store: Arc<MemoryStore>,
        pub config: Arc<AuthConfig>,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_profile(octocat())
        }

        pub fn with_profile(profile: OAuthProfile) -> Self {
            let store = Arc::new(MemoryStore::default());
            let config = test_config();
            let router =
                auth_router_generic(store.clone(), Arc::new(FakeOAuth { profile }), config.clone());
            Self {
                router,
                store,
                config,
            }
        }
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn request_with_cookie(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` pairs of every Set-Cookie header
    pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// `name=value` for the cookie called `name`, ready for a Cookie header
    pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
        set_cookies(response)
            .into_iter()
            .find(|c| c.starts_with(&format!("{name}=")))
            .and_then(|c| c.split(';').next().map(str::to_string))
    }

    pub fn sign_up_body(username: &str, email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Jane Doe",
            "username": username,
            "email": email,
            "password": "Str0ng!Pass",
        })
    }
}

#[cfg(test)]
mod flow_tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::support::*;

    const SESSION_COOKIE: &str = "devoverflow.session_token";

    #[tokio::test]
    async fn test_sign_up_sign_in_get_session_sign_out() {
        let app = TestApp::new();

        // Sign up
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("Jane_Doe", "Jane@Example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response, SESSION_COOKIE).expect("session cookie");
        let body = body_json(response).await;
        assert_eq!(body["user"]["username"], "Jane_Doe");
        assert_eq!(body["user"]["email"], "jane@example.com");
        assert_eq!(body["user"]["id"].as_str().unwrap().len(), 21);
        assert!(body["token"].as_str().unwrap().contains('.'));
        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.account_count(), 1);

        // Session from sign-up is live
        let response = app
            .router
            .clone()
            .oneshot(request_with_cookie("GET", "/get-session", Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["user"]["username"], "Jane_Doe");
        assert!(body["session"]["expiresAt"].is_string());

        // Sign in
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-in/email",
                serde_json::json!({ "email": "jane@example.com", "password": "Str0ng!Pass" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response, SESSION_COOKIE).expect("session cookie");
        assert_eq!(app.store.session_count(), 2);

        // Sign out
        let response = app
            .router
            .clone()
            .oneshot(request_with_cookie("POST", "/sign-out", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = set_cookies(&response);
        assert!(cleared.iter().any(|c| c.contains("Max-Age=0")));
        assert_eq!(app.store.session_count(), 1);

        // Session is gone
        let response = app
            .router
            .clone()
            .oneshot(request_with_cookie("GET", "/get-session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.is_null());
    }

    #[tokio::test]
    async fn test_get_session_without_cookie_is_null() {
        let app = TestApp::new();
        let response = app
            .router
            .oneshot(request_with_cookie("GET", "/get-session", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.is_null());
    }

    #[tokio::test]
    async fn test_forged_cookie_is_null() {
        let app = TestApp::new();
        let forged = format!("{SESSION_COOKIE}={}.AAAA", uuid::Uuid::new_v4());
        let response = app
            .router
            .oneshot(request_with_cookie("GET", "/get-session", Some(&forged)))
            .await
            .unwrap();
        assert!(body_json(response).await.is_null());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_clears_cookie() {
        let app = TestApp::new();
        let response = app
            .router
            .oneshot(request_with_cookie("POST", "/sign-out", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookies(&response)[0].starts_with("devoverflow.session_token=;"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let app = TestApp::new();
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("jane", "jane@example.com"),
            ))
            .await
            .unwrap();

        for (email, password) in [
            ("jane@example.com", "Wr0ng!Pass"),
            ("nobody@example.com", "Str0ng!Pass"),
        ] {
            let response = app
                .router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/sign-in/email",
                    serde_json::json!({ "email": email, "password": password }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["code"], "INVALID_EMAIL_OR_PASSWORD");
        }
    }

    #[tokio::test]
    async fn test_validation_errors_list_every_field() {
        let app = TestApp::new();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                serde_json::json!({ "name": "Jo", "username": "a b", "email": "nope", "password": "short" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let fields = &body["details"]["fields"];
        assert_eq!(fields["email"][0], "Please enter a valid email address.");
        assert_eq!(fields["name"][0], "Full name must be at least 3 characters long.");
        assert!(fields["username"].as_array().unwrap().len() >= 1);
        assert!(fields["password"].as_array().unwrap().len() >= 3);
        assert_eq!(app.store.user_count(), 0);
    }
}

#[cfg(test)]
mod hook_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use platform::client::ClientInfo;
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::hooks::{HookChain, NoHooks, SignUpConflictRemapHook};
    use crate::application::sign_up::SignUpUseCase;
    use crate::domain::validation::SignUpForm;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_duplicate_email_is_remapped() {
        let app = TestApp::new();
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("first", "taken@example.com"),
            ))
            .await
            .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("second", "TAKEN@example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL");
        assert_eq!(body["message"], "Email already in use.");
        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.account_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let app = TestApp::new();
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("DevUser", "one@example.com"),
            ))
            .await
            .unwrap();

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("DevUser", "two@example.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "USERNAME_ALREADY_EXISTS");
        assert_eq!(body["message"], "Username is taken.");
        assert_eq!(app.store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_usernames_differing_in_case_are_distinct() {
        let app = TestApp::new();
        for (username, email) in [("alice", "one@example.com"), ("Alice", "two@example.com")] {
            let response = app
                .router
                .clone()
                .oneshot(json_request("POST", "/sign-up/email", sign_up_body(username, email)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(app.store.user_count(), 2);
    }

    #[tokio::test]
    async fn test_sign_up_session_is_stored_with_user() {
        let store = Arc::new(MemoryStore::default());
        let use_case = SignUpUseCase::new(
            store.clone(),
            Arc::new(HookChain(NoHooks, SignUpConflictRemapHook)),
            test_config(),
        );
        let form = |email: &str| SignUpForm {
            username: "jane_doe".to_string(),
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "Str0ng!Pass".to_string(),
        };

        let output = use_case
            .execute(form("jane@example.com"), ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(store.sessions_for(&output.user.user_id), 1);
        assert!(store
            .sessions
            .lock()
            .unwrap()
            .contains_key(&output.session.session.session_id));

        // A rejected sign-up leaves neither a user nor a session behind
        assert!(use_case
            .execute(form("other@example.com"), ClientInfo::default())
            .await
            .is_err());
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.session_count(), 1);
    }

    /// Without the pre-check, the storage constraint still decides
    #[tokio::test]
    async fn test_constraint_catches_username_race() {
        let store = Arc::new(MemoryStore::default());
        let use_case = SignUpUseCase::new(
            store.clone(),
            Arc::new(HookChain(NoHooks, SignUpConflictRemapHook)),
            test_config(),
        );

        let form = |email: &str| SignUpForm {
            username: "racer".to_string(),
            name: "Race Car".to_string(),
            email: email.to_string(),
            password: "Str0ng!Pass".to_string(),
        };

        assert!(use_case.execute(form("a@example.com"), ClientInfo::default()).await.is_ok());
        let err = use_case
            .execute(form("b@example.com"), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameAlreadyExists { .. }));
        assert_eq!(err.client_message(), "Username is taken.");
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_without_remap_hook_raw_code_surfaces() {
        let store = Arc::new(MemoryStore::default());
        let use_case = SignUpUseCase::new(store.clone(), Arc::new(NoHooks), test_config());

        let form = |username: &str| SignUpForm {
            username: username.to_string(),
            name: "Same Mail".to_string(),
            email: "same@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
        };

        use_case.execute(form("first"), ClientInfo::default()).await.unwrap();
        let err = use_case
            .execute(form("second"), ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "USER_ALREADY_EXISTS");
    }
}

#[cfg(test)]
mod oauth_tests {
    use axum::http::{StatusCode, header};
    use tower::ServiceExt;

    use super::support::*;
    use crate::domain::oauth::OAuthProfile;

    const STATE_COOKIE: &str = "devoverflow.oauth_state";

    /// Start the GitHub flow and return `(state, "name=value" state cookie)`
    async fn start(app: &TestApp, callback: Option<&str>) -> (String, String) {
        start_with(app, "github", callback).await
    }

    async fn start_with(app: &TestApp, provider: &str, callback: Option<&str>) -> (String, String) {
        let mut body = serde_json::json!({ "provider": provider });
        if let Some(callback) = callback {
            body["callbackURL"] = callback.into();
        }
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/sign-in/social", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_pair(&response, STATE_COOKIE).expect("state cookie");
        let body = body_json(response).await;
        assert_eq!(body["redirect"], true);

        let url = url::Url::parse(body["url"].as_str().unwrap()).unwrap();
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        (state, cookie)
    }

    async fn callback(
        app: &TestApp,
        code: &str,
        state: &str,
        cookie: Option<&str>,
    ) -> axum::http::Response<axum::body::Body> {
        callback_with(app, "github", code, state, cookie).await
    }

    async fn callback_with(
        app: &TestApp,
        provider: &str,
        code: &str,
        state: &str,
        cookie: Option<&str>,
    ) -> axum::http::Response<axum::body::Body> {
        let uri = format!(
            "/callback/{provider}?code={code}&state={}",
            url::form_urlencoded::byte_serialize(state.as_bytes()).collect::<String>()
        );
        app.router
            .clone()
            .oneshot(request_with_cookie("GET", &uri, cookie))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_user_is_created_and_redirected() {
        let app = TestApp::new();
        let (state, cookie) = start(&app, Some("/questions/7")).await;

        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://localhost:3000/questions/7"
        );
        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("devoverflow.session_token=")));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("devoverflow.oauth_state=;") && c.contains("Max-Age=0")));

        let users = app.store.users.lock().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username.original(), "octocat");
        assert!(users[0].email_verified);
    }

    #[tokio::test]
    async fn test_returning_user_reuses_account() {
        let app = TestApp::new();
        for _ in 0..2 {
            let (state, cookie) = start(&app, None).await;
            let response = callback(&app, "good", &state, Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "http://localhost:3000/");
        }
        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.account_count(), 1);
        assert_eq!(app.store.session_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_email_is_linked() {
        let app = TestApp::new();
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("mona", "octocat@github.com"),
            ))
            .await
            .unwrap();

        let (state, cookie) = start(&app, None).await;
        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.account_count(), 2);
    }

    #[tokio::test]
    async fn test_unverified_email_is_not_linked() {
        let app = TestApp::with_profile(OAuthProfile {
            provider_account_id: "attacker-1".to_string(),
            email: Some("victim@example.com".to_string()),
            email_verified: false,
            ..octocat()
        });
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("victim", "victim@example.com"),
            ))
            .await
            .unwrap();
        let victim = app.store.user_by_email("victim@example.com");

        let (state, cookie) = start(&app, None).await;
        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("devoverflow.session_token=")));
        assert_eq!(body_json(response).await["code"], "ACCOUNT_NOT_LINKED");

        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.accounts_for(&victim.user_id).len(), 1);
        assert_eq!(app.store.sessions_for(&victim.user_id), 1);
    }

    #[tokio::test]
    async fn test_unverified_email_still_creates_new_user() {
        let app = TestApp::with_profile(OAuthProfile {
            email_verified: false,
            ..octocat()
        });
        let (state, cookie) = start(&app, None).await;

        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let user = app.store.user_by_email("octocat@github.com");
        assert!(!user.email_verified);
    }

    #[tokio::test]
    async fn test_second_provider_links_to_same_user() {
        let app = TestApp::new();
        let (state, cookie) = start_with(&app, "github", None).await;
        let response = callback_with(&app, "github", "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let (state, cookie) = start_with(&app, "google", None).await;
        let response = callback_with(&app, "google", "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert_eq!(app.store.user_count(), 1);
        let user = app.store.user_by_email("octocat@github.com");
        let mut providers: Vec<String> = app
            .store
            .accounts_for(&user.user_id)
            .into_iter()
            .map(|a| a.provider_id)
            .collect();
        providers.sort();
        assert_eq!(providers, ["github", "google"]);
        assert_eq!(app.store.sessions_for(&user.user_id), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callback_reuses_linked_account() {
        let app = TestApp::new();
        let (state, cookie) = start(&app, None).await;
        callback(&app, "good", &state, Some(&cookie)).await;

        // The lookup misses the account the other callback just inserted
        app.store
            .stale_provider_lookup
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let (state, cookie) = start(&app, None).await;
        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        assert_eq!(app.store.user_count(), 1);
        assert_eq!(app.store.account_count(), 1);
        assert_eq!(app.store.session_count(), 2);
    }

    #[tokio::test]
    async fn test_taken_username_gets_suffix() {
        let app = TestApp::new();
        app.router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("octocat", "someone@example.com"),
            ))
            .await
            .unwrap();

        let (state, cookie) = start(&app, None).await;
        callback(&app, "good", &state, Some(&cookie)).await;

        let users = app.store.users.lock().unwrap();
        assert_eq!(users.len(), 2);
        let derived = users[1].username.original();
        assert!(derived.starts_with("octocat"), "{derived}");
        assert!(derived.len() > "octocat".len());
        assert!(derived["octocat".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_missing_state_cookie_rejected() {
        let app = TestApp::new();
        let (state, _) = start(&app, None).await;

        let response = callback(&app, "good", &state, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_OAUTH_STATE");
        assert_eq!(app.store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let app = TestApp::new();
        let (state, cookie) = start(&app, None).await;

        let response = callback(&app, "bad", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["code"], "OAUTH_EXCHANGE_FAILED");
    }

    #[tokio::test]
    async fn test_profile_without_email_rejected() {
        let app = TestApp::with_profile(OAuthProfile {
            email: None,
            ..octocat()
        });
        let (state, cookie) = start(&app, None).await;

        let response = callback(&app, "good", &state, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(app.store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_callback_rejected() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-in/social",
                serde_json::json!({ "provider": "github", "callbackURL": "https://evil.example" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"]["fields"]["callbackURL"][0], "Invalid callback URL");
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let app = TestApp::new();
        let response = app
            .router
            .oneshot(json_request(
                "POST",
                "/sign-in/social",
                serde_json::json!({ "provider": "myspace" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "PROVIDER_NOT_FOUND");
    }
}

#[cfg(test)]
mod middleware_tests {
    use axum::http::StatusCode;
    use axum::{Extension, Router, middleware, routing::get};
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::middleware::{
        AuthMiddlewareState, AuthenticatedUser, require_auth_session,
    };

    fn protected(app: &TestApp) -> Router {
        let state = AuthMiddlewareState::new(app.store.clone(), app.config.clone());
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthenticatedUser>| async move {
                    user.public_id.to_string()
                }),
            )
            .layer(middleware::from_fn(move |req, next| {
                require_auth_session(state.clone(), req, next)
            }))
    }

    #[tokio::test]
    async fn test_rejects_without_session() {
        let app = TestApp::new();
        let response = protected(&app)
            .oneshot(request_with_cookie("GET", "/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_passes_authenticated_user_through() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/sign-up/email",
                sign_up_body("member", "member@example.com"),
            ))
            .await
            .unwrap();
        let cookie = cookie_pair(&response, "devoverflow.session_token").unwrap();
        let public_id = body_json(response).await["user"]["id"].clone();

        let response = protected(&app)
            .oneshot(request_with_cookie("GET", "/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(public_id.as_str().unwrap().as_bytes(), &bytes[..]);
    }
}
