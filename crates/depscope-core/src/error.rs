//! Propagated tool errors.
//!
//! Tools have two failure channels. Problems with the caller's input or a
//! refusal from the upstream service are returned as structured error
//! results (see [`crate::error_result`]) and shown to the agent verbatim.
//! Everything in this module is the other channel: the invocation itself
//! could not complete, and the dispatcher should handle and log it.

use thiserror::Error;

/// Boxed error used as the cause of a [`ToolError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Infrastructure failure that aborts a tool invocation.
///
/// Every variant renders as `<context>: <cause>` and exposes the cause
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// The client-provisioning capability could not supply a client.
    #[error("failed to get GitHub client: {0}")]
    ClientUnavailable(#[source] BoxError),

    /// The outbound request could not be constructed.
    #[error("failed to create request: {0}")]
    RequestBuild(#[source] BoxError),

    /// The request failed below the HTTP layer.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] BoxError),

    /// The payload could not be decoded or re-encoded.
    #[error("{context}: {source}")]
    Encoding {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    pub fn client_unavailable(source: impl Into<BoxError>) -> Self {
        ToolError::ClientUnavailable(source.into())
    }

    pub fn request_build(source: impl Into<BoxError>) -> Self {
        ToolError::RequestBuild(source.into())
    }

    pub fn transport(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ToolError::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn body_read(source: impl Into<BoxError>) -> Self {
        ToolError::BodyRead(source.into())
    }

    pub fn encoding(context: impl Into<String>, source: serde_json::Error) -> Self {
        ToolError::Encoding {
            context: context.into(),
            source,
        }
    }

    /// Short, low-cardinality label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::ClientUnavailable(_) => "client_unavailable",
            ToolError::RequestBuild(_) => "request_build",
            ToolError::Transport { .. } => "transport",
            ToolError::BodyRead(_) => "body_read",
            ToolError::Encoding { .. } => "encoding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_prefixes_context() {
        let err = ToolError::client_unavailable("token missing");
        assert_eq!(err.to_string(), "failed to get GitHub client: token missing");

        let err = ToolError::transport("failed to get dependency changes", "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to get dependency changes: connection refused"
        );
    }

    #[test]
    fn test_encoding_keeps_source() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = ToolError::encoding("failed to marshal dependency changes", source);

        assert!(
            err.to_string()
                .starts_with("failed to marshal dependency changes: ")
        );
        assert!(err.source().is_some());
        assert_eq!(err.kind(), "encoding");
    }
}
