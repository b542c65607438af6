//! Registration form

use crate::session::SessionStore;

use super::{is_valid_email, INVALID_EMAIL};

/// Shortest password accepted before contacting the backend
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    submitting: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Local checks; the message is shown as an error toast
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_email(&self.email) {
            return Err(INVALID_EMAIL);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match");
        }
        Ok(())
    }

    /// Validate, register and log in. Returns true on success.
    pub async fn submit(&mut self, session: &SessionStore) -> bool {
        if let Err(message) = self.validate() {
            session.notifier().error(message);
            return false;
        }

        self.submitting = true;
        let result = session.register(self.email.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                session
                    .notifier()
                    .error("Registration failed. Email may already be in use.");
                false
            }
        }
    }
}
