//! Bubble REST API
//!
//! Client for the Bubble backend.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/jwt/login` - Exchange form-encoded credentials for a bearer token
//! - `POST /auth/register` - Create an account
//! - `GET /users/me` - Current user profile (bearer)
//!
//! ## Posts
//! - `GET /feed` - All posts, newest first
//! - `POST /upload` - Multipart `file` + `caption`
//! - `DELETE /post/{id}` - Delete one of your posts (bearer)
//!
//! ## Health
//! - `GET /health` - Liveness probe
//!
//! # Example
//!
//! ```rust,no_run
//! use bubble::api::ApiClient;
//! use bubble::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::anonymous(&ApiConfig::new("http://localhost:8000"))?;
//!     let health = client.health().await?;
//!     println!("{}", health.message);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ApiClient, CredentialSource, NoCredentials};
pub use dto::{
    FeedResponse, FileType, HealthResponse, Post, RegisterRequest, TokenResponse, UploadRequest,
    UserProfile,
};
pub use error::{ApiError, ApiResult};
