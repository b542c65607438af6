//! # Bubble
//!
//! Client core for the Bubble photo and video sharing service. Holds the
//! session lifecycle, talks to the REST backend and exposes headless view
//! models that a front end (the bundled CLI, a GUI, a test) drives.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the backend endpoints
//! - [`session`]: token persistence, login/logout and hydration
//! - [`router`]: routes, navigation and the route guard
//! - [`views`]: Home, Login, Register, Feed, Upload and Navbar view models
//! - [`notify`]: toast notifications
//! - [`config`]: file and environment configuration
//! - [`app`]: wiring of the above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bubble::{App, Config, Route};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(Config::load_default()).await?;
//!     app.start().await;
//!
//!     let mut toasts = app.notifier().subscribe();
//!
//!     let mut form = app.login_form();
//!     form.email = "a@b.com".to_string();
//!     form.password = "secret1".to_string();
//!     if form.submit(app.session()).await {
//!         assert_eq!(app.navigator().current(), Route::Feed);
//!
//!         let mut feed = app.feed();
//!         feed.load().await?;
//!         println!("{} posts", feed.posts().len());
//!     }
//!
//!     while let Ok(toast) = toasts.try_recv() {
//!         println!("{}", toast);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod notify;
pub mod router;
pub mod session;
pub mod views;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, FileType, Post, UserProfile};

pub use app::App;

pub use config::{Config, ConfigError, FeedLogoutPolicy};

pub use notify::{Notifier, Toast, ToastKind};

pub use router::{guard, GuardDecision, Navigator, Route};

pub use session::{
    FileTokenStore, HydrationOutcome, MemoryTokenStore, Session, SessionError, SessionResult,
    SessionStore, TokenStore,
};

pub use views::{FeedView, HomeView, LoginForm, Navbar, RegisterForm, UploadError, UploadView};
