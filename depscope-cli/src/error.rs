use std::path::PathBuf;

use depscope_core::TranslationError;
use depscope_github::ConfigError;
use depscope_mcp::McpError;
use depscope_tools::ToolsetError;
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Toolset(#[from] ToolsetError),

    #[error(transparent)]
    Server(#[from] McpError),

    #[error("GITHUB_PERSONAL_ACCESS_TOKEN is not set")]
    MissingToken,

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
