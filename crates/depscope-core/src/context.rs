//! Per-invocation call context.

use uuid::Uuid;

/// Metadata for a single tool invocation.
///
/// A fresh context is created by the dispatcher for every call. Client
/// providers receive it so they can scope credentials to the call, and
/// handlers use it to tag their tracing spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    request_id: String,
    tool: String,
}

impl CallContext {
    /// Create a context for an invocation of `tool` with a random request id.
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            tool: tool.into(),
        }
    }

    /// Use the id the transport assigned to the request.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Tracing span covering the invocation.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("tool_call", tool = %self.tool, request_id = %self.request_id)
    }
}
