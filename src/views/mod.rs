//! Views
//!
//! Headless view models for each screen. A front end renders their state
//! and forwards user input to their methods; the views talk to the session
//! store or the API client and report back through toasts and navigation.
//!
//! - [`HomeView`]: backend health message
//! - [`LoginForm`] / [`RegisterForm`]: credential forms
//! - [`FeedView`]: post list with refresh and confirm-then-delete
//! - [`UploadView`]: draft selection, validation and submission
//! - [`Navbar`]: session-dependent links and confirmed logout

mod confirm;
mod feed;
mod home;
mod login;
mod navbar;
mod register;
mod upload;

pub use confirm::ConfirmPrompt;
pub use feed::FeedView;
pub use home::{HealthStatus, HomeView};
pub use login::LoginForm;
pub use navbar::{NavItem, Navbar, BRAND};
pub use register::RegisterForm;
pub use upload::{
    guess_mime_type, validate_selection, MediaKind, Preview, SelectedFile, UploadDraft,
    UploadError, UploadView, MAX_UPLOAD_BYTES,
};

use regex::Regex;
use std::sync::OnceLock;

pub(crate) const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Loose shape check matching what a browser `type="email"` input accepts
pub(crate) fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email(" user.name+tag@example.co.uk "));
        assert!(!is_valid_email(""));
        assert!(is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("a b@c.com"));
    }
}
