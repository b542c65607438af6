//! Session
//!
//! The session store owns the bearer token and the resolved user profile.
//! It is the only writer of that state; views read snapshots and call its
//! operations (`login`, `register`, `logout`, `hydrate`).
//!
//! ## Lifecycle
//!
//! 1. On construction the persisted token (if any) is loaded and the
//!    session starts in the `loading` state.
//! 2. [`SessionStore::hydrate`] validates the token against `/users/me`.
//!    A failed validation clears the session exactly like a logout.
//! 3. `login` persists a new token; `logout` removes it.

mod state;
mod storage;
mod store;

pub use state::{Session, SharedSession};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
pub use store::{HydrationOutcome, SessionStore};

use crate::api::ApiError;
use thiserror::Error;

/// Errors surfaced by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    /// Login answered 2xx without an access token
    #[error("Login response did not include an access token")]
    MissingToken,
}

impl SessionError {
    /// True when the backend rejected the credentials
    pub fn is_auth_failure(&self) -> bool {
        match self {
            SessionError::Api(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
