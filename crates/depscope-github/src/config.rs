//! # GitHub client configuration
//!
//! Configuration can come from a TOML table, from environment variables, or
//! both; environment values are applied on top of file values.
//!
//! ## Environment Variables
//!
//! - `GITHUB_PERSONAL_ACCESS_TOKEN` - Bearer token for the REST API
//! - `GITHUB_HOST` - GitHub Enterprise host; `github.com` (default) maps to
//!   `https://api.github.com/`, any other host to `https://{host}/api/v3/`
//! - `DEPSCOPE_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `DEPSCOPE_USER_AGENT` - User agent sent with every request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
pub const HOST_ENV: &str = "GITHUB_HOST";
pub const TIMEOUT_ENV: &str = "DEPSCOPE_REQUEST_TIMEOUT_SECS";
pub const USER_AGENT_ENV: &str = "DEPSCOPE_USER_AGENT";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_user_agent() -> String {
    format!("depscope/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection settings for the GitHub REST API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub or GitHub Enterprise host; `None` means github.com
    pub host: Option<String>,
    /// Personal access token, never serialized back out
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            host: None,
            token: None,
            request_timeout_secs: 30,
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GitHubConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// REST API root for the configured host, always ending in `/`.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let default = || {
            Url::parse(DEFAULT_API_URL).map_err(|e| ConfigError::ValidationError(e.to_string()))
        };

        let Some(host) = self.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) else {
            return default();
        };

        let with_scheme = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        let mut url = Url::parse(&with_scheme).map_err(|e| {
            ConfigError::ValidationError(format!("invalid GitHub host '{host}': {e}"))
        })?;

        match url.host_str() {
            Some("github.com") | Some("api.github.com") => return default(),
            None => {
                return Err(ConfigError::ValidationError(format!(
                    "GitHub host '{host}' has no hostname"
                )));
            }
            Some(_) => {}
        }

        if url.path() == "/" {
            url.set_path("/api/v3/");
        } else if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Validate configuration (fail-fast)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "user_agent cannot be empty".to_string(),
            ));
        }
        self.api_base_url()?;
        Ok(())
    }
}

/// Builder for [`GitHubConfig`] with environment variable support
#[derive(Debug, Clone, Default)]
pub struct GitHubConfigBuilder {
    config: GitHubConfig,
}

impl GitHubConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing values, e.g. a parsed config file.
    #[must_use]
    pub fn from_config(config: GitHubConfig) -> Self {
        Self { config }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new().apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`. Empty values count as unset.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(TOKEN_ENV) {
            self.config.token = Some(token);
        }
        if let Some(host) = get(HOST_ENV) {
            self.config.host = Some(host);
        }
        if let Some(timeout) = get(TIMEOUT_ENV) {
            self.config.request_timeout_secs = parse_u64(TIMEOUT_ENV, &timeout)?;
        }
        if let Some(user_agent) = get(USER_AGENT_ENV) {
            self.config.user_agent = user_agent;
        }
        Ok(self)
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<GitHubConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Parse a boolean environment value.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: format!("invalid boolean value '{value}', expected true/false/1/0/yes/no/on/off"),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: format!("invalid u64 value '{value}': {e}"),
        })
}
