//! # GitHub REST client
//!
//! A thin wrapper over a pooled `reqwest::Client` that knows the API base
//! URL, attaches GitHub's standard headers and the bearer token, and hands
//! back the raw response. Status handling is left to the caller.

use reqwest::header::ACCEPT;
use reqwest::{Method, Request, Response};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, DEFAULT_API_URL, GitHubConfig, TOKEN_ENV};

/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";
pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Errors produced while provisioning or using a [`GitHubClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("no GitHub token configured, set {}", TOKEN_ENV)]
    MissingToken,

    #[error("invalid API base URL '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },

    #[error("invalid request path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated client for one GitHub API host.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GitHubClient {
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::default()
    }

    /// Build a client from validated configuration.
    pub fn from_config(config: &GitHubConfig) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(config.api_base_url()?.as_str())
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout());
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.token(token);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build a request for `path`, resolved against the base URL.
    ///
    /// `path` must be relative (no leading `/`) so that an Enterprise
    /// prefix such as `/api/v3/` is preserved. A query string may be
    /// included. The path is used as given; any normalization is the URL
    /// parser's.
    pub fn new_request(&self, method: Method, path: &str) -> Result<Request, ClientError> {
        if path.starts_with('/') {
            return Err(ClientError::InvalidPath {
                path: path.to_string(),
                message: "path must be relative to the API base URL".to_string(),
            });
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidPath {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request.build()?)
    }

    /// Send a request. Any HTTP status is returned as `Ok`.
    pub async fn execute(&self, request: Request) -> Result<Response, ClientError> {
        debug!(method = %request.method(), url = %request.url(), "Sending GitHub API request");
        let response = self.http.execute(request).await?;
        debug!(status = response.status().as_u16(), "Received GitHub API response");
        Ok(response)
    }
}

/// Builder for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubClientBuilder {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        let config = GitHubConfig::default();
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: config.user_agent.clone(),
            timeout: Some(config.request_timeout()),
        }
    }
}

impl GitHubClientBuilder {
    /// API root; a trailing `/` is added when missing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GitHubClient, ClientError> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|source| ClientError::InvalidBaseUrl {
            url: base.clone(),
            source,
        })?;

        let mut http = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(ClientError::Build)?;

        Ok(GitHubClient {
            http,
            base_url,
            token: self.token,
        })
    }
}
