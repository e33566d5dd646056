//! MCP error types

use rmcp::ErrorData;
use rmcp::service::ServerInitializeError;
use thiserror::Error;

/// MCP operation result type
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur during MCP operations
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The session ended before the initialize handshake completed
    #[error("MCP initialization failed: {0}")]
    Initialize(#[from] ServerInitializeError),

    /// The session task panicked or was aborted
    #[error("MCP session failed: {0}")]
    Session(#[from] tokio::task::JoinError),
}

impl From<McpError> for ErrorData {
    fn from(err: McpError) -> Self {
        match err {
            McpError::ToolNotFound(_) => ErrorData::invalid_params(err.to_string(), None),
            _ => ErrorData::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_error_data_codes() {
        let not_found = ErrorData::from(McpError::ToolNotFound("create_issue".to_string()));
        assert_eq!(not_found.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(not_found.message, "Tool not found: create_issue");

        let failed = ErrorData::from(McpError::ToolExecutionFailed("boom".to_string()));
        assert_eq!(failed.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(failed.message, "Tool execution failed: boom");
    }
}
