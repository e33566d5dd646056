//! Client provisioning.
//!
//! Tools never build their own HTTP clients. They are handed a
//! [`ClientProvider`] at construction time and ask it for a client on every
//! call, which lets the host decide how credentials are scoped.

use async_trait::async_trait;
use depscope_core::CallContext;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::{ClientError, GitHubClient};
use crate::config::GitHubConfig;

/// Supplies an authenticated [`GitHubClient`] for one invocation.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn client(&self, ctx: &CallContext) -> Result<GitHubClient, ClientError>;
}

#[async_trait]
impl<F> ClientProvider for F
where
    F: Fn(&CallContext) -> Result<GitHubClient, ClientError> + Send + Sync,
{
    async fn client(&self, ctx: &CallContext) -> Result<GitHubClient, ClientError> {
        (self)(ctx)
    }
}

/// Provider backed by static configuration.
///
/// The client is built on first use and shared afterwards. Without a token
/// every request fails with [`ClientError::MissingToken`].
#[derive(Debug)]
pub struct ConfiguredClientProvider {
    config: GitHubConfig,
    client: OnceCell<GitHubClient>,
}

impl ConfiguredClientProvider {
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }
}

#[async_trait]
impl ClientProvider for ConfiguredClientProvider {
    async fn client(&self, ctx: &CallContext) -> Result<GitHubClient, ClientError> {
        if !self.config.has_token() {
            return Err(ClientError::MissingToken);
        }

        let client = self
            .client
            .get_or_try_init(|| async {
                debug!(request_id = %ctx.request_id(), "Building GitHub client");
                GitHubClient::from_config(&self.config)
            })
            .await?;
        Ok(client.clone())
    }
}
