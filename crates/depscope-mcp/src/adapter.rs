//! Adapter to expose depscope tools in MCP format

use depscope_core::{CallContext, CallToolRequest, Tool, ToolAnnotations};
use rmcp::model::{self, CallToolResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::error;

use crate::error::{McpError, McpResult};

/// Adapter that wraps a depscope tool for MCP compatibility
#[derive(Clone)]
pub struct ToolAdapter {
    tool: Arc<dyn Tool>,
}

impl ToolAdapter {
    /// Create a new tool adapter
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        Self { tool }
    }

    /// Get the tool name
    pub fn name(&self) -> &str {
        self.tool.name()
    }

    /// Invoke the tool with a JSON arguments object.
    ///
    /// Structured error results come back as `Ok`; only propagated tool
    /// errors become [`McpError::ToolExecutionFailed`].
    pub async fn call(
        &self,
        ctx: &CallContext,
        arguments: Map<String, Value>,
    ) -> McpResult<CallToolResult> {
        let request = CallToolRequest::new(self.name()).with_arguments(arguments);

        self.tool.call(ctx, &request).await.map_err(|e| {
            error!(
                tool = %self.name(),
                request_id = %ctx.request_id(),
                kind = e.kind(),
                error = %e,
                "Tool invocation failed"
            );
            McpError::ToolExecutionFailed(e.to_string())
        })
    }

    /// Convert to MCP tool definition
    pub fn to_mcp_tool(&self) -> model::Tool {
        let descriptor = self.tool.descriptor();
        let annotations = descriptor.annotations();

        let mut tool = model::Tool::new(
            descriptor.name().to_string(),
            descriptor.description().to_string(),
            descriptor.input_schema().to_object(),
        );
        tool.title = descriptor.title().map(str::to_string);
        if annotations != &ToolAnnotations::default() {
            tool = tool.annotate(mcp_annotations(annotations));
        }
        tool
    }
}

fn mcp_annotations(annotations: &ToolAnnotations) -> model::ToolAnnotations {
    model::ToolAnnotations {
        title: annotations.title.clone(),
        read_only_hint: annotations.read_only_hint,
        destructive_hint: annotations.destructive_hint,
        idempotent_hint: annotations.idempotent_hint,
        open_world_hint: annotations.open_world_hint,
    }
}

/// Registry of adapted tools
#[derive(Clone, Default)]
pub struct AdaptedToolRegistry {
    tools: Vec<ToolAdapter>,
}

impl AdaptedToolRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from tools, keeping the first tool registered under each name.
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.add_tool(tool);
        }
        registry
    }

    /// Add a tool to the registry. Returns `false` if the name is taken.
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) -> bool {
        if self.find(tool.name()).is_some() {
            return false;
        }
        self.tools.push(ToolAdapter::new(tool));
        true
    }

    /// Get all tools
    pub fn tools(&self) -> &[ToolAdapter] {
        &self.tools
    }

    /// Find a tool by name
    pub fn find(&self, name: &str) -> Option<&ToolAdapter> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Get all tool definitions for MCP
    pub fn list_tools(&self) -> Vec<model::Tool> {
        self.tools.iter().map(ToolAdapter::to_mcp_tool).collect()
    }
}
