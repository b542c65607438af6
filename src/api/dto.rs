//! Data Transfer Objects
//!
//! Request and response types exchanged with the Bubble backend.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ============================================
// AUTH DTOs
// ============================================

/// Response of `POST /auth/jwt/login`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Missing when the backend answers 2xx without issuing a token
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Current user profile, as returned by `GET /users/me` and `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_verified: bool,
}

fn default_true() -> bool {
    true
}

// ============================================
// FEED DTOs
// ============================================

/// Media type of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Photo,
    Video,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Photo => write!(f, "photo"),
            FileType::Video => write!(f, "video"),
        }
    }
}

/// A single post in the feed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    pub id: Uuid,
    /// Owner email
    #[serde(default)]
    pub email: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub file_type: FileType,
    pub url: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default, deserialize_with = "deserialize_caption")]
    pub caption: Option<String>,
    /// Computed by the backend for the requesting user
    #[serde(default)]
    pub is_owner: bool,
}

/// Response of `GET /feed`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Multipart upload payload for `POST /upload`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
    pub caption: String,
}

// ============================================
// MISC DTOs
// ============================================

/// Response of `GET /health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// FastAPI error body: `{"detail": ...}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    /// Human-readable detail; string details are returned verbatim
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Accepts RFC 3339 timestamps and naive ISO timestamps (taken as UTC)
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))
}

fn deserialize_caption<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let caption = Option::<String>::deserialize(deserializer)?;
    Ok(caption.filter(|c| !c.trim().is_empty()))
}
