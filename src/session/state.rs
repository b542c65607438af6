//! Session state shared between the store and the API client

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::api::{CredentialSource, UserProfile};

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Opaque bearer token
    pub token: Option<String>,
    /// Only set once the token has been validated against the backend
    pub user: Option<UserProfile>,
    /// Hydration in progress; route decisions wait while set
    pub loading: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Cloneable handle to the session. Reads are public; writes stay in the crate.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }
}

#[async_trait]
impl CredentialSource for SharedSession {
    async fn bearer_token(&self) -> Option<String> {
        self.token().await
    }
}
