//! Routing
//!
//! Application routes, the navigator that tracks the current one, and the
//! route guard that gates protected views on session state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::Session;

/// Application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Feed,
    Upload,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Feed,
        Route::Upload,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Feed => "/feed",
            Route::Upload => "/upload",
        }
    }

    /// Parse a location path. Unknown paths fall back to Home.
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Home)
    }

    /// Routes that require an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Feed | Route::Upload)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guarded navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still hydrating; show a neutral loading state
    Loading,
    /// Go somewhere else instead
    Redirect(Route),
    /// Render the requested view
    Render(Route),
}

/// Decide what to show for `requested` given the current session.
pub fn guard(session: &Session, requested: Route) -> GuardDecision {
    if !requested.is_protected() {
        return GuardDecision::Render(requested);
    }
    if session.loading {
        return GuardDecision::Loading;
    }
    if session.token.is_none() {
        return GuardDecision::Redirect(Route::Login);
    }
    GuardDecision::Render(requested)
}

/// Tracks the current route and lets front ends observe changes
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn navigate(&self, route: Route) {
        let previous = self.current.send_replace(route);
        if previous != route {
            tracing::debug!(from = %previous, to = %route, "navigate");
        }
    }

    /// Navigate once `delay` has elapsed
    pub fn navigate_after(&self, route: Route, delay: Duration) -> JoinHandle<()> {
        let navigator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(route);
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: Option<&str>, loading: bool) -> Session {
        Session {
            token: token.map(str::to_string),
            user: None,
            loading,
        }
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_unknown_path_falls_back_to_home() {
        assert_eq!(Route::from_path("/nope"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/feed/"), Route::Feed);
        assert_eq!(Route::from_path("/upload?draft=1"), Route::Upload);
    }

    #[test]
    fn test_guard_while_hydrating() {
        let s = session(Some("tok"), true);
        assert_eq!(guard(&s, Route::Feed), GuardDecision::Loading);
        assert_eq!(guard(&s, Route::Upload), GuardDecision::Loading);
        assert_eq!(guard(&s, Route::Login), GuardDecision::Render(Route::Login));
    }

    #[test]
    fn test_guard_without_token_redirects() {
        let s = session(None, false);
        assert_eq!(guard(&s, Route::Feed), GuardDecision::Redirect(Route::Login));
        assert_eq!(guard(&s, Route::Home), GuardDecision::Render(Route::Home));
        assert_eq!(guard(&s, Route::Register), GuardDecision::Render(Route::Register));
    }

    #[test]
    fn test_guard_with_token_renders() {
        let s = session(Some("tok"), false);
        assert_eq!(guard(&s, Route::Feed), GuardDecision::Render(Route::Feed));
        assert_eq!(guard(&s, Route::Upload), GuardDecision::Render(Route::Upload));
    }

    #[tokio::test]
    async fn test_navigator_notifies_subscribers() {
        let navigator = Navigator::default();
        let mut rx = navigator.subscribe();

        navigator.navigate(Route::Login);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Route::Login);
        assert_eq!(navigator.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_navigate_after_delay() {
        let navigator = Navigator::new(Route::Upload);
        let handle = navigator.navigate_after(Route::Feed, Duration::from_millis(10));

        assert_eq!(navigator.current(), Route::Upload);
        handle.await.unwrap();
        assert_eq!(navigator.current(), Route::Feed);
    }
}
