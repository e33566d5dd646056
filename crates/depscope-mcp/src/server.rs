//! MCP Server implementation that exposes depscope tools

use std::sync::Arc;

use depscope_core::{CallContext, Tool};
use depscope_tools::ToolsetGroup;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::adapter::AdaptedToolRegistry;
use crate::error::{McpError, McpResult};

/// MCP Server that exposes depscope tools
pub struct McpServer {
    registry: AdaptedToolRegistry,
    implementation: Implementation,
}

impl McpServer {
    /// Create a server exposing `tools`.
    pub fn new(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        Self {
            registry: AdaptedToolRegistry::from_tools(tools),
            implementation: Implementation {
                name: "depscope".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
        }
    }

    /// Create a server exposing the active tools of `group`.
    pub fn from_toolsets(group: &ToolsetGroup) -> Self {
        Self::new(group.active_tools())
    }

    /// Get the tool registry
    pub fn registry(&self) -> &AdaptedToolRegistry {
        &self.registry
    }

    /// Definitions of every exposed tool, as sent for `tools/list`.
    pub fn tool_definitions(&self) -> Vec<rmcp::model::Tool> {
        self.registry.list_tools()
    }

    /// Call a tool by name.
    pub async fn dispatch(
        &self,
        ctx: &CallContext,
        arguments: Map<String, Value>,
    ) -> McpResult<CallToolResult> {
        let tool = self
            .registry
            .find(ctx.tool())
            .ok_or_else(|| McpError::ToolNotFound(ctx.tool().to_string()))?;

        debug!(tool = %ctx.tool(), request_id = %ctx.request_id(), "Calling tool");
        let result = tool.call(ctx, arguments).await?;
        debug!(
            tool = %ctx.tool(),
            request_id = %ctx.request_id(),
            is_error = result.is_error.unwrap_or(false),
            "Tool execution completed"
        );
        Ok(result)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: self.implementation.clone(),
            instructions: None,
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let ctx = CallContext::new(request.name.as_ref()).with_request_id(context.id.to_string());
        let arguments = request.arguments.unwrap_or_default();

        // Dropping the dispatch future abandons the upstream request.
        tokio::select! {
            result = self.dispatch(&ctx, arguments) => result.map_err(ErrorData::from),
            _ = context.ct.cancelled() => {
                info!(tool = %ctx.tool(), request_id = %ctx.request_id(), "Tool call cancelled");
                Err(ErrorData::internal_error("request cancelled", None))
            }
        }
    }
}
