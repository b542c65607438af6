//! Application
//!
//! Wires the session store, navigator and notifier together. Front ends
//! hold one [`App`], call [`start`](App::start) once, and route every
//! navigation through [`open`](App::open) so the guard is applied.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::notify::Notifier;
use crate::router::{guard, GuardDecision, Navigator, Route};
use crate::session::{FileTokenStore, HydrationOutcome, SessionResult, SessionStore, TokenStore};
use crate::views::{FeedView, HomeView, LoginForm, Navbar, RegisterForm, UploadView};

/// Shared application state
#[derive(Debug, Clone)]
pub struct App {
    config: Arc<Config>,
    session: Arc<SessionStore>,
}

impl App {
    /// Build the app with the token persisted under `storage.data_dir`
    pub async fn new(config: Config) -> SessionResult<Self> {
        let tokens = FileTokenStore::new(
            config.storage.storage_file(),
            config.storage.token_key.clone(),
        );
        Self::with_token_store(config, Arc::new(tokens)).await
    }

    /// Build the app over a caller-supplied token store
    pub async fn with_token_store(
        config: Config,
        tokens: Arc<dyn TokenStore>,
    ) -> SessionResult<Self> {
        let session = SessionStore::new(
            &config.api,
            tokens,
            Notifier::default(),
            Navigator::default(),
        )
        .await?;

        tracing::debug!(base_url = %session.api().base_url(), "App initialized");
        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
        })
    }

    /// Resolve the persisted token, if any
    pub async fn start(&self) -> HydrationOutcome {
        self.session.hydrate().await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub fn navigator(&self) -> &Navigator {
        self.session.navigator()
    }

    pub fn notifier(&self) -> &Notifier {
        self.session.notifier()
    }

    /// Guard decision for `route` against the current session
    pub async fn resolve(&self, route: Route) -> GuardDecision {
        guard(&self.session.snapshot().await, route)
    }

    /// Navigate to `route` through the guard. A `Loading` decision leaves
    /// the current route in place.
    pub async fn open(&self, route: Route) -> GuardDecision {
        let decision = self.resolve(route).await;
        match decision {
            GuardDecision::Render(target) | GuardDecision::Redirect(target) => {
                self.navigator().navigate(target);
            }
            GuardDecision::Loading => {
                tracing::debug!(route = %route, "Session loading, deferring navigation");
            }
        }
        decision
    }

    /// Navigate to a location path such as `/feed?tab=1`
    pub async fn open_path(&self, path: &str) -> GuardDecision {
        self.open(Route::from_path(path)).await
    }

    pub fn home(&self) -> HomeView {
        HomeView::mount(self.api().clone())
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new()
    }

    pub fn register_form(&self) -> RegisterForm {
        RegisterForm::new()
    }

    pub fn feed(&self) -> FeedView {
        FeedView::new(self.session.clone(), self.config.feed.logout_on)
    }

    pub fn upload(&self) -> UploadView {
        UploadView::new(self.session.clone(), self.config.upload.redirect_delay())
    }

    pub fn navbar(&self) -> Navbar {
        Navbar::new()
    }
}
