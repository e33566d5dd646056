//! # depscope MCP - Model Context Protocol server
//!
//! Exposes depscope tools to MCP clients such as editors and agent hosts.
//!
//! ## Features
//!
//! - **Tool adapter**: renders tool descriptors as MCP tool definitions
//! - **Server handler**: `tools/list` and `tools/call` with per-call cancellation
//! - **Line transport**: newline-delimited JSON-RPC that answers malformed input
//!   with an error instead of ending the session
//!
//! ## Example: MCP Server
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use depscope_core::TranslationHelper;
//! use depscope_github::{ConfiguredClientProvider, GitHubConfigBuilder};
//! use depscope_mcp::McpServer;
//! use depscope_tools::default_toolset_group;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GitHubConfigBuilder::from_env()?.build()?;
//!     let clients = Arc::new(ConfiguredClientProvider::new(config));
//!
//!     let mut toolsets = default_toolset_group(clients, &TranslationHelper::new(), true)?;
//!     toolsets.enable_toolsets(&["all"])?;
//!
//!     McpServer::from_toolsets(&toolsets).serve_stdio().await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod server;
pub mod transport;

pub use adapter::{AdaptedToolRegistry, ToolAdapter};
pub use error::{McpError, McpResult};
pub use server::McpServer;
pub use transport::{LineTransport, serve};
