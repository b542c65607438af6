//! Navigation bar

use super::ConfirmPrompt;
use crate::router::Route;
use crate::session::{Session, SessionResult, SessionStore};

/// Brand shown at the start of the bar; links to Home
pub const BRAND: &str = "Bubble";

/// A link in the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

impl NavItem {
    const fn new(label: &'static str, route: Route) -> Self {
        Self { label, route }
    }
}

#[derive(Debug, Clone)]
pub struct Navbar {
    logout_prompt: ConfirmPrompt<()>,
}

impl Default for Navbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Navbar {
    pub fn new() -> Self {
        Self {
            logout_prompt: ConfirmPrompt::logout(),
        }
    }

    /// Links for the current session. Logout is not a link; see
    /// [`request_logout`](Self::request_logout).
    pub fn items(session: &Session) -> Vec<NavItem> {
        if session.is_authenticated() {
            vec![
                NavItem::new("Feed", Route::Feed),
                NavItem::new("Upload", Route::Upload),
            ]
        } else {
            vec![
                NavItem::new("Login", Route::Login),
                NavItem::new("Sign Up", Route::Register),
            ]
        }
    }

    /// Email of the signed-in user, once the profile has loaded
    pub fn user_badge(session: &Session) -> Option<&str> {
        session.user.as_ref().map(|u| u.email.as_str())
    }

    pub fn logout_prompt(&self) -> &ConfirmPrompt<()> {
        &self.logout_prompt
    }

    pub fn request_logout(&mut self) {
        self.logout_prompt.open(());
    }

    pub fn cancel_logout(&mut self) {
        self.logout_prompt.cancel();
    }

    /// Log out if the prompt is open. Returns whether logout ran.
    pub async fn confirm_logout(&mut self, session: &SessionStore) -> SessionResult<bool> {
        if self.logout_prompt.confirm().is_none() {
            return Ok(false);
        }
        session.logout().await?;
        Ok(true)
    }
}
