//! # depscope tools
//!
//! GitHub tools exposed by depscope, grouped into toolsets.
//!
//! ```rust
//! use std::sync::Arc;
//! use depscope_core::{CallContext, NullTranslator, Tool};
//! use depscope_github::{ClientError, GitHubClient};
//! use depscope_tools::default_toolset_group;
//!
//! let clients = Arc::new(|_: &CallContext| -> Result<GitHubClient, ClientError> {
//!     GitHubClient::builder().token("ghp_example").build()
//! });
//! let mut group = default_toolset_group(clients, &NullTranslator, true).unwrap();
//! group.enable_toolsets(&["all"]).unwrap();
//!
//! let tools = group.active_tools();
//! assert_eq!(tools[0].name(), "get_dependency_review_compare");
//! ```

pub mod dependency_review;
pub mod toolset;

pub use dependency_review::DependencyReviewCompareTool;
pub use toolset::{
    ALL_TOOLSETS, DEPENDENCY_GRAPH_TOOLSET, Toolset, ToolsetError, ToolsetGroup,
    default_toolset_group,
};
