//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Create config pointing at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Base URL without a trailing slash
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Client-side persisted state configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key under which the bearer token is stored
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bubble").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bubble_data".to_string())
}

fn default_token_key() -> String {
    "token".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            token_key: default_token_key(),
        }
    }
}

impl StorageConfig {
    /// Create config rooted at a specific directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    /// Path of the key-value file holding persisted client state
    pub fn storage_file(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("storage.json")
    }
}

/// Upload view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Delay between a successful upload and the redirect to the feed
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
}

fn default_redirect_delay() -> u64 {
    1000
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay(),
        }
    }
}

impl UploadConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Feed view configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub logout_on: FeedLogoutPolicy,
}

/// Which feed fetch failures terminate the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedLogoutPolicy {
    /// Only 401/403 responses log the user out
    #[default]
    AuthErrors,
    /// Any failure logs the user out
    AnyError,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing config file in the default locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bubble").join("config.toml")),
            Some(PathBuf::from("./bubble.toml")),
        ];
        config_paths.into_iter().flatten().find(|path| path.exists())
    }

    /// Load `path`, or the first default location, with environment
    /// overrides. Falls back to defaults only when no file exists; a file
    /// that cannot be read or parsed is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_with_env(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        match Self::load_from(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::from_env()
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BUBBLE_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(secs) = std::env::var("BUBBLE_API_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.api.request_timeout_secs = Some(s);
            }
        }

        if let Ok(data_dir) = std::env::var("BUBBLE_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Ok(level) = std::env::var("BUBBLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BUBBLE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Bubble Configuration
#
# Environment variables override these settings:
# - BUBBLE_API_URL
# - BUBBLE_API_TIMEOUT_SECS
# - BUBBLE_DATA_DIR
# - BUBBLE_LOG_LEVEL
# - BUBBLE_LOG_FORMAT

[api]
# Base URL of the Bubble backend
base_url = "http://localhost:8000"

# Request timeout in seconds (omit to use the transport default)
# request_timeout_secs = 30

[storage]
# Directory holding the persisted session token
data_dir = "~/.local/share/bubble"

# Key the bearer token is stored under
token_key = "token"

[upload]
# Delay before returning to the feed after a successful upload (ms)
redirect_delay_ms = 1000

[feed]
# Which feed errors end the session: "auth_errors" (401/403) or "any_error"
logout_on = "auth_errors"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert!(config.api.request_timeout().is_none());
        assert_eq!(config.storage.token_key, "token");
        assert_eq!(config.upload.redirect_delay(), Duration::from_millis(1000));
        assert_eq!(config.feed.logout_on, FeedLogoutPolicy::AuthErrors);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.feed.logout_on, FeedLogoutPolicy::AuthErrors);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://bubble.example.com/"
            request_timeout_secs = 10

            [feed]
            logout_on = "any_error"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.normalized_base_url(), "https://bubble.example.com");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.feed.logout_on, FeedLogoutPolicy::AnyError);
        assert_eq!(config.upload.redirect_delay_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bubble.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"/tmp/bubble-test\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/bubble-test");
        assert_eq!(
            config.storage.storage_file(),
            PathBuf::from("/tmp/bubble-test/storage.json")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/bubble.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nbase_url = 1\n").unwrap();
        assert!(matches!(
            Config::load_from(Some(&bad)),
            Err(ConfigError::Parse { .. })
        ));

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[upload]\nredirect_delay_ms = 5\n").unwrap();
        let config = Config::load_from(Some(&good)).unwrap();
        assert_eq!(config.upload.redirect_delay_ms, 5);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[feed]\nlogout_on = \"sometimes\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
