//! Helpers for building and reading tool results.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Successful result carrying a single text block.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Structured (non-fatal) error result carrying a single text block.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

pub fn is_error_result(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

/// Text of the first text block, if any.
pub fn result_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|c| match &c.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
