//! # depscope core
//!
//! Shared building blocks for depscope tools:
//!
//! - **Tool contract**: [`Tool`], [`ToolDescriptor`], [`InputSchema`] and
//!   [`ToolAnnotations`] describe a callable operation and its parameters.
//! - **Invocation envelope**: [`CallToolRequest`] and [`CallContext`] carry
//!   the untyped arguments and per-call metadata into a handler.
//! - **Parameter extraction**: [`required_param`] and [`optional_param`]
//!   turn untyped arguments into typed values.
//! - **Results**: [`text_result`] and [`error_result`] build the MCP result
//!   envelope, while [`ToolError`] is the propagated infrastructure failure.
//! - **Translations**: [`Translator`] makes every human-readable string
//!   replaceable.

pub mod context;
pub mod error;
pub mod params;
pub mod result;
pub mod tool;
pub mod translations;

pub use context::CallContext;
pub use error::{BoxError, ToolError};
pub use params::{ParamError, ParamValue, optional_param, required_param};
pub use result::{error_result, is_error_result, result_text, text_result};
pub use tool::{CallToolRequest, InputSchema, ParamSpec, Tool, ToolAnnotations, ToolDescriptor};
pub use translations::{NullTranslator, TranslationError, TranslationHelper, Translator};
