//! SessionStore - the authenticated identity and its bearer credentials.
//!
//! The only writer of the persisted token pair. `user` is present exactly
//! when `tokens` are present and were last validated against
//! `GET /api/users/me/`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{UserType, ValidationError};
use crate::domain::navigation::SessionSnapshot;
use crate::domain::session::{Credentials, Registration, TokenPair, User};
use crate::ports::{ApiGateway, HttpMethod, TokenStore};

use super::wire::{decode, encode};
use super::ClientError;

pub const TOKEN_PATH: &str = "/api/auth/jwt/create/";
pub const ME_PATH: &str = "/api/users/me/";
pub const REGISTER_PATH: &str = "/api/register/";

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    tokens: Option<TokenPair>,
    loading: bool,
    bootstrap_started: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            tokens: None,
            loading: true,
            bootstrap_started: false,
        }
    }
}

/// Holds who is logged in.
pub struct SessionStore {
    gateway: Arc<dyn ApiGateway>,
    token_store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn ApiGateway>, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            gateway,
            token_store,
            state: RwLock::new(SessionState::default()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════════

    /// Restores a persisted session.
    ///
    /// A stored pair is validated by fetching the current user. Any failure
    /// (unreadable storage, rejected token, unreachable server) ends in a
    /// full logout rather than an error. `loading` becomes false on every
    /// path. Calling it again is a no-op.
    pub async fn bootstrap(&self) {
        {
            let mut state = self.write();
            if state.bootstrap_started {
                return;
            }
            state.bootstrap_started = true;
        }

        let stored = match self.token_store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted tokens unreadable, starting logged out");
                self.logout();
                None
            }
        };

        if let Some(tokens) = stored {
            match self.fetch_me(tokens.access_token()).await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, user_type = %user.user_type, "Session restored");
                    let mut state = self.write();
                    state.user = Some(user);
                    state.tokens = Some(tokens);
                }
                Err(e) => {
                    tracing::info!(error = %e, "Stored session rejected, logging out");
                    self.logout();
                }
            }
        }

        self.write().loading = false;
    }

    /// Exchanges credentials for tokens and loads the user.
    ///
    /// Returns the role so the caller can pick the landing view.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserType, ClientError> {
        let credentials = Credentials::new(username, password);
        credentials.validate()?;

        let body = encode(TOKEN_PATH, &credentials)?;
        let response = self
            .gateway
            .request(HttpMethod::Post, TOKEN_PATH, Some(body), None)
            .await?;
        let tokens: TokenPair = decode(TOKEN_PATH, response)?;

        let user = self.fetch_me(tokens.access_token()).await?;
        self.token_store.save(&tokens)?;

        let user_type = user.user_type;
        tracing::info!(user_id = %user.id, %user_type, "Logged in");
        let mut state = self.write();
        state.user = Some(user);
        state.tokens = Some(tokens);
        state.loading = false;
        Ok(user_type)
    }

    /// Login from a portal that only admits one role.
    ///
    /// A role mismatch is reported as `WrongPortal`; the session stays
    /// logged in so the user can switch portals without signing in again.
    pub async fn login_for_portal(
        &self,
        username: &str,
        password: &str,
        expected: UserType,
    ) -> Result<UserType, ClientError> {
        let actual = self.login(username, password).await?;
        if actual != expected {
            tracing::debug!(%expected, %actual, "Login from the wrong portal");
            return Err(ValidationError::WrongPortal { expected, actual }.into());
        }
        Ok(actual)
    }

    /// Creates an account. Does not log in.
    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        registration.validate()?;
        let body = encode(REGISTER_PATH, registration)?;
        self.gateway
            .request(HttpMethod::Post, REGISTER_PATH, Some(body), None)
            .await?;
        tracing::info!(username = %registration.username, user_type = %registration.user_type, "Registered");
        Ok(())
    }

    /// Forgets the session in memory and on disk. Safe to call repeatedly.
    pub fn logout(&self) {
        {
            let mut state = self.write();
            if state.user.is_some() {
                tracing::info!("Logged out");
            }
            state.user = None;
            state.tokens = None;
        }
        if let Err(e) = self.token_store.clear() {
            tracing::error!(error = %e, "Failed to clear persisted tokens");
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Readers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Access token read fresh for each request.
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .tokens
            .as_ref()
            .map(|t| t.access_token().to_string())
    }

    /// Access token, or `NotAuthenticated`.
    pub fn require_token(&self) -> Result<String, ValidationError> {
        self.access_token().ok_or(ValidationError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// What route dispatch needs to know.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            loading: state.loading,
            user_type: state.user.as_ref().map(|u| u.user_type),
        }
    }

    async fn fetch_me(&self, access: &str) -> Result<User, ClientError> {
        let response = self
            .gateway
            .request(HttpMethod::Get, ME_PATH, None, Some(access))
            .await?;
        decode(ME_PATH, response)
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockGateway};
    use crate::application::test_support::user_json;
    use crate::ports::GatewayError;
    use serde_json::json;

    fn tokens_json() -> serde_json::Value {
        json!({"access": "acc-1", "refresh": "ref-1"})
    }

    fn store_with(
        gateway: &Arc<MockGateway>,
        tokens: &Arc<InMemoryTokenStore>,
    ) -> SessionStore {
        SessionStore::new(gateway.clone(), tokens.clone())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Bootstrap
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn bootstrap_without_tokens_finishes_logged_out() {
        let gateway = Arc::new(MockGateway::new());
        let tokens = Arc::new(InMemoryTokenStore::new());
        let session = store_with(&gateway, &tokens);
        assert!(session.is_loading());

        session.bootstrap().await;

        assert!(!session.is_loading());
        assert!(!session.is_authenticated());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn bootstrap_with_valid_tokens_restores_user() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(3, "kamau", UserType::Buyer)),
        );
        let tokens = Arc::new(InMemoryTokenStore::with_tokens(TokenPair::new("acc", "ref")));
        let session = store_with(&gateway, &tokens);

        session.bootstrap().await;

        assert_eq!(session.user().map(|u| u.username), Some("kamau".to_string()));
        assert_eq!(session.access_token().as_deref(), Some("acc"));
        assert_eq!(gateway.last_call().unwrap().token.as_deref(), Some("acc"));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn bootstrap_with_rejected_token_logs_out_and_clears_storage() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::api_error(401, json!({"detail": "Given token not valid for any token type"})),
        );
        let tokens = Arc::new(InMemoryTokenStore::with_tokens(TokenPair::new("stale", "ref")));
        let session = store_with(&gateway, &tokens);

        session.bootstrap().await;

        assert!(session.user().is_none());
        assert!(session.access_token().is_none());
        assert!(tokens.is_empty());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn bootstrap_with_unreadable_storage_finishes_logged_out() {
        let gateway = Arc::new(MockGateway::new());
        let tokens = Arc::new(InMemoryTokenStore::unreadable());
        let session = store_with(&gateway, &tokens);

        session.bootstrap().await;

        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn second_bootstrap_is_a_noop() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond_always(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(3, "kamau", UserType::Buyer)),
        );
        let tokens = Arc::new(InMemoryTokenStore::with_tokens(TokenPair::new("acc", "ref")));
        let session = store_with(&gateway, &tokens);

        session.bootstrap().await;
        session.bootstrap().await;

        assert_eq!(gateway.call_count(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Login / logout
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn login_persists_tokens_and_returns_role() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(HttpMethod::Post, TOKEN_PATH, MockGateway::ok(tokens_json()));
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(9, "otieno", UserType::Farmer)),
        );
        let tokens = Arc::new(InMemoryTokenStore::new());
        let session = store_with(&gateway, &tokens);

        let role = session.login("otieno", "pw").await.unwrap();

        assert_eq!(role, UserType::Farmer);
        assert_eq!(tokens.load().unwrap(), Some(TokenPair::new("acc-1", "ref-1")));
        assert_eq!(
            session.snapshot(),
            SessionSnapshot { loading: false, user_type: Some(UserType::Farmer) }
        );
        let exchange = &gateway.calls_to(HttpMethod::Post, TOKEN_PATH)[0];
        assert_eq!(exchange.body, Some(json!({"username": "otieno", "password": "pw"})));
        assert_eq!(exchange.token, None);
    }

    #[tokio::test]
    async fn login_with_bad_credentials_surfaces_api_error() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(
            HttpMethod::Post,
            TOKEN_PATH,
            MockGateway::api_error(
                401,
                json!({"detail": "No active account found with the given credentials"}),
            ),
        );
        let tokens = Arc::new(InMemoryTokenStore::new());
        let session = store_with(&gateway, &tokens);

        let err = session.login("otieno", "wrong").await.unwrap_err();

        assert!(matches!(err, ClientError::Gateway(GatewayError::Api(ref e)) if e.status == 401));
        assert!(!session.is_authenticated());
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn login_with_blank_username_makes_no_call() {
        let gateway = Arc::new(MockGateway::new());
        let session = store_with(&gateway, &Arc::new(InMemoryTokenStore::new()));

        let err = session.login(" ", "pw").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn wrong_portal_is_rejected_but_session_kept() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(HttpMethod::Post, TOKEN_PATH, MockGateway::ok(tokens_json()));
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(3, "kamau", UserType::Buyer)),
        );
        let session = store_with(&gateway, &Arc::new(InMemoryTokenStore::new()));

        let err = session
            .login_for_portal("kamau", "pw", UserType::Farmer)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::WrongPortal {
                expected: UserType::Farmer,
                actual: UserType::Buyer
            })
        ));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(HttpMethod::Post, TOKEN_PATH, MockGateway::ok(tokens_json()));
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(3, "kamau", UserType::Buyer)),
        );
        let tokens = Arc::new(InMemoryTokenStore::new());
        let session = store_with(&gateway, &tokens);
        session.login("kamau", "pw").await.unwrap();

        session.logout();
        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(tokens.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Registration
    // ════════════════════════════════════════════════════════════════════════════

    fn registration() -> Registration {
        Registration {
            username: "wanjiru".to_string(),
            email: "wanjiru@example.com".to_string(),
            password: "secret".to_string(),
            re_password: "secret".to_string(),
            phone_number: "254712345678".to_string(),
            location: "Eldoret".to_string(),
            user_type: UserType::Farmer,
        }
    }

    #[tokio::test]
    async fn register_posts_form_without_logging_in() {
        let gateway = Arc::new(MockGateway::new());
        gateway.respond(HttpMethod::Post, REGISTER_PATH, MockGateway::no_content());
        let session = store_with(&gateway, &Arc::new(InMemoryTokenStore::new()));

        session.register(&registration()).await.unwrap();

        let call = gateway.last_call().unwrap();
        assert_eq!(call.body.unwrap()["user_type"], "FARMER");
        assert!(!session.is_authenticated());
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn register_with_mismatched_passwords_makes_no_call() {
        let gateway = Arc::new(MockGateway::new());
        let session = store_with(&gateway, &Arc::new(InMemoryTokenStore::new()));
        let mut form = registration();
        form.re_password = "other".to_string();

        let err = session.register(&form).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(ValidationError::PasswordMismatch)));
        assert_eq!(gateway.call_count(), 0);
    }
}
