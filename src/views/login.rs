//! Login form

use crate::session::SessionStore;

use super::{is_valid_email, INVALID_EMAIL};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit the form. Returns true when the session was established;
    /// failures are reported as toasts.
    pub async fn submit(&mut self, session: &SessionStore) -> bool {
        if !is_valid_email(&self.email) {
            session.notifier().error(INVALID_EMAIL);
            return false;
        }
        if self.password.is_empty() {
            session.notifier().error("Please enter your password");
            return false;
        }

        self.submitting = true;
        let result = session.login(self.email.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                session.notifier().error("Invalid email or password");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{drain, Notifier, ToastKind};
    use crate::router::{Navigator, Route};
    use crate::session::MemoryTokenStore;
    use crate::testing::FakeBackend;
    use std::sync::Arc;

    async fn store(backend: &FakeBackend) -> SessionStore {
        SessionStore::new(
            &backend.api_config(),
            Arc::new(MemoryTokenStore::new()),
            Notifier::default(),
            Navigator::new(Route::Login),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_credentials_reach_feed() {
        let backend = FakeBackend::start().await;
        backend.add_user("a@b.com", "secret1");
        let session = store(&backend).await;

        let mut form = LoginForm::with_credentials("a@b.com", "secret1");
        assert!(form.submit(&session).await);

        assert!(session.token().await.is_some());
        assert_eq!(session.navigator().current(), Route::Feed);
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_wrong_password_toasts() {
        let backend = FakeBackend::start().await;
        backend.add_user("a@b.com", "secret1");
        let session = store(&backend).await;
        let mut toasts = session.notifier().subscribe();

        let mut form = LoginForm::with_credentials("a@b.com", "nope");
        assert!(!form.submit(&session).await);

        let toasts = drain(&mut toasts);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "Invalid email or password");
        assert_eq!(session.navigator().current(), Route::Login);
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_locally() {
        let backend = FakeBackend::start().await;
        let session = store(&backend).await;
        let mut toasts = session.notifier().subscribe();

        let mut form = LoginForm::with_credentials("not-an-email", "secret1");
        assert!(!form.submit(&session).await);

        assert_eq!(drain(&mut toasts)[0].message, INVALID_EMAIL);
        assert_eq!(backend.total_requests(), 0);
    }
}
