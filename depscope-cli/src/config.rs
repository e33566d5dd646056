//! Server configuration.
//!
//! Values are resolved in order: TOML file, then environment, then command
//! line flags (applied by the caller).
//!
//! ```toml
//! read_only = true
//! toolsets = ["dependency_graph"]
//! translations_file = "depscope-config.json"
//!
//! [github]
//! host = "ghes.example.com"
//! request_timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};

use depscope_github::{ConfigError, GitHubConfig, GitHubConfigBuilder, parse_bool};
use depscope_tools::ALL_TOOLSETS;
use serde::{Deserialize, Serialize};

pub const READ_ONLY_ENV: &str = "DEPSCOPE_READ_ONLY";
pub const TOOLSETS_ENV: &str = "DEPSCOPE_TOOLSETS";

/// Translation file picked up from the working directory when present.
pub const DEFAULT_TRANSLATIONS_FILE: &str = "depscope-config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub github: GitHubConfig,
    /// Expose read tools only
    pub read_only: bool,
    /// Toolsets to enable; `all` enables every toolset
    pub toolsets: Vec<String>,
    pub translations_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            read_only: false,
            toolsets: vec![ALL_TOOLSETS.to_string()],
            translations_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Load the optional file and overlay the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key: &str| std::env::var(key).ok())
    }

    /// Load the optional file and overlay values from `lookup`.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        config.github = GitHubConfigBuilder::from_config(config.github)
            .apply_env(&lookup)?
            .build()?;

        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(value) = get(READ_ONLY_ENV) {
            config.read_only = parse_bool(READ_ONLY_ENV, value.trim())?;
        }
        if let Some(value) = get(TOOLSETS_ENV) {
            config.toolsets = split_list(&value);
        }
        Ok(config)
    }

    /// Validate configuration (fail-fast)
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.github.validate()?;
        if self.toolsets.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one toolset must be enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Explicit translation file, or the default one if it exists.
    pub fn translations_path(&self) -> (PathBuf, bool) {
        match &self.translations_file {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_TRANSLATIONS_FILE), false),
        }
    }
}

/// Split a comma separated list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
