//! Session store: login, register, logout and hydration

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::state::{Session, SharedSession};
use super::storage::{StorageError, TokenStore};
use super::{SessionError, SessionResult};
use crate::api::{ApiClient, RegisterRequest, UserProfile};
use crate::config::ApiConfig;
use crate::notify::Notifier;
use crate::router::{Navigator, Route};

/// Result of resolving the persisted token into a user profile
#[derive(Debug, Clone, PartialEq)]
pub enum HydrationOutcome {
    /// No token was stored
    Anonymous,
    /// Token validated; profile loaded
    Authenticated(UserProfile),
    /// Token rejected or unverifiable; session cleared
    Expired,
    /// The session changed while the profile was in flight; result ignored
    Superseded,
}

/// Owner of the token/user pair
pub struct SessionStore {
    session: SharedSession,
    tokens: Arc<dyn TokenStore>,
    /// Held across every paired update of the persisted and in-memory token
    op_lock: Mutex<()>,
    api: ApiClient,
    notifier: Notifier,
    navigator: Navigator,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build the store and load any persisted token.
    ///
    /// A stored token puts the session in the `loading` state until
    /// [`hydrate`](Self::hydrate) resolves it. An unreadable store is
    /// treated as holding no token.
    pub async fn new(
        api_config: &ApiConfig,
        tokens: Arc<dyn TokenStore>,
        notifier: Notifier,
        navigator: Navigator,
    ) -> SessionResult<Self> {
        let token = match tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Ignoring unreadable token storage: {}", e);
                None
            }
        };

        let session = SharedSession::new(Session {
            loading: token.is_some(),
            token,
            user: None,
        });
        let api = ApiClient::new(api_config, Arc::new(session.clone()))?;

        Ok(Self {
            session,
            tokens,
            op_lock: Mutex::new(()),
            api,
            notifier,
            navigator,
        })
    }

    /// API client whose requests carry this session's token
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn shared(&self) -> &SharedSession {
        &self.session
    }

    pub async fn snapshot(&self) -> Session {
        self.session.snapshot().await
    }

    pub async fn token(&self) -> Option<String> {
        self.session.token().await
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.session.snapshot().await.user
    }

    pub async fn is_loading(&self) -> bool {
        self.session.snapshot().await.loading
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.token().await.is_some()
    }

    /// Exchange credentials for a token, persist it and go to the feed.
    ///
    /// Errors leave the session untouched. The profile is resolved after
    /// navigation; a rejected profile logs the session back out.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<()> {
        let response = self.api.login(email, password).await?;
        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        {
            let _op = self.op_lock.lock().await;
            self.tokens.save(&token).await?;
            let mut session = self.session.write().await;
            session.token = Some(token);
            session.user = None;
            session.loading = true;
        }

        tracing::info!(email = %email, "Logged in");
        self.notifier.success("Welcome back!");
        self.navigator.navigate(Route::Feed);

        self.hydrate().await;
        Ok(())
    }

    /// Create an account, then log in with the same credentials
    pub async fn register(&self, email: &str, password: &str) -> SessionResult<()> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.register(&body).await?;

        tracing::info!(email = %email, "Registered");
        self.notifier.success("Account created successfully!");
        self.login(email, password).await
    }

    /// Clear the token and profile and go to the login view.
    ///
    /// The persisted token is always cleared; the toast is only shown when
    /// a session was active.
    pub async fn logout(&self) -> SessionResult<()> {
        let (was_active, cleared) = {
            let op = self.op_lock.lock().await;
            self.clear(&op).await
        };
        self.finish_logout(was_active);
        cleared.map_err(SessionError::from)
    }

    /// Clear memory and storage. Callers hold the operation lock.
    async fn clear(&self, _op: &MutexGuard<'_, ()>) -> (bool, Result<(), StorageError>) {
        let was_active = {
            let mut session = self.session.write().await;
            let was_active = session.token.is_some() || session.user.is_some();
            session.token = None;
            session.user = None;
            session.loading = false;
            was_active
        };
        (was_active, self.tokens.clear().await)
    }

    fn finish_logout(&self, was_active: bool) {
        if was_active {
            tracing::info!("Logged out");
            self.notifier.success("Logged out successfully");
        }
        self.navigator.navigate(Route::Login);
    }

    /// Resolve the current token into a user profile.
    pub async fn hydrate(&self) -> HydrationOutcome {
        let token = {
            let mut session = self.session.write().await;
            match session.token.clone() {
                Some(token) => {
                    session.loading = true;
                    token
                }
                None => {
                    session.loading = false;
                    return HydrationOutcome::Anonymous;
                }
            }
        };

        let result = self.api.current_user().await;

        let op = self.op_lock.lock().await;
        let mut session = self.session.write().await;
        if session.token.as_deref() != Some(token.as_str()) {
            tracing::debug!("Session changed during hydration, ignoring profile response");
            return HydrationOutcome::Superseded;
        }

        match result {
            Ok(user) => {
                tracing::info!(email = %user.email, "Session restored");
                session.user = Some(user.clone());
                session.loading = false;
                HydrationOutcome::Authenticated(user)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch user: {}", e);
                drop(session);
                let (was_active, cleared) = self.clear(&op).await;
                drop(op);
                if let Err(e) = cleared {
                    tracing::warn!("Failed to clear stored token: {}", e);
                }
                self.finish_logout(was_active);
                HydrationOutcome::Expired
            }
        }
    }
}
