//! Tool contract: descriptor, parameter schema, annotations and invocation.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::context::CallContext;
use crate::error::ToolError;
use crate::params::ParamValue;

/// A single named parameter in a tool's input schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    name: String,
    kind: &'static str,
    description: String,
    required: bool,
}

impl ParamSpec {
    /// Declare an optional parameter extracted as `T`.
    pub fn new<T: ParamValue>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: T::TYPE_NAME,
            description: String::new(),
            required: false,
        }
    }

    /// Declare an optional string parameter.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new::<String>(name)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// JSON Schema type of the parameter.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn describe(&self) -> &str {
        &self.description
    }

    fn to_json(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(self.kind));
        if !self.description.is_empty() {
            property.insert("description".to_string(), json!(self.description));
        }
        Value::Object(property)
    }
}

/// Ordered set of parameters accepted by a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. A later parameter with the same name replaces the earlier one.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.retain(|existing| existing.name != spec.name);
        self.params.push(spec);
        self
    }

    pub fn properties(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.to_object())
    }

    /// The JSON Schema as a bare object map.
    pub fn to_object(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.to_json()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        let required = self.required();
        if !required.is_empty() {
            schema.insert("required".to_string(), json!(required));
        }
        schema
    }
}

/// Behavior hints published alongside a tool.
///
/// These are hints only. Clients should not make trust decisions based on
/// annotations from untrusted servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Human-readable display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the tool only reads without modifying its environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// Whether modifications are destructive rather than additive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    /// Whether repeated identical calls have no additional effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    /// Whether the tool interacts with external entities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

impl ToolAnnotations {
    /// Annotations for a tool that performs no mutation.
    pub fn read_only(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            read_only_hint: Some(true),
            ..Self::default()
        }
    }
}

/// Declaration of a tool, consumed once at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: InputSchema,
    annotations: ToolAnnotations,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::new(),
            annotations: ToolAnnotations::default(),
        }
    }

    pub fn with_param(mut self, spec: ParamSpec) -> Self {
        self.input_schema = self.input_schema.param(spec);
        self
    }

    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    pub fn annotations(&self) -> &ToolAnnotations {
        &self.annotations
    }

    pub fn title(&self) -> Option<&str> {
        self.annotations.title.as_deref()
    }

    /// Whether the tool declares itself free of side effects.
    pub fn is_read_only(&self) -> bool {
        self.annotations.read_only_hint.unwrap_or(false)
    }
}

/// Untyped invocation of a named tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallToolRequest {
    name: String,
    arguments: Map<String, Value>,
}

impl CallToolRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }
}

/// A callable operation exposed to agents.
///
/// Implementations return `Ok` with either a success or a structured error
/// result for anything the caller can act on, and `Err` only when the
/// invocation itself could not complete.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use depscope_core::{
///     CallContext, CallToolRequest, ParamSpec, Tool, ToolDescriptor, ToolError,
///     error_result, required_param, text_result,
/// };
/// use rmcp::model::CallToolResult;
///
/// struct Echo {
///     descriptor: ToolDescriptor,
/// }
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn descriptor(&self) -> &ToolDescriptor {
///         &self.descriptor
///     }
///
///     async fn call(
///         &self,
///         _ctx: &CallContext,
///         request: &CallToolRequest,
///     ) -> Result<CallToolResult, ToolError> {
///         match required_param::<String>(request, "message") {
///             Ok(message) => Ok(text_result(message)),
///             Err(e) => Ok(error_result(e.to_string())),
///         }
///     }
/// }
///
/// let echo = Echo {
///     descriptor: ToolDescriptor::new("echo", "Echo a message")
///         .with_param(ParamSpec::string("message").required()),
/// };
/// assert_eq!(echo.name(), "echo");
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static declaration of the tool.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Unique name used to route calls.
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Execute one invocation.
    async fn call(
        &self,
        ctx: &CallContext,
        request: &CallToolRequest,
    ) -> Result<CallToolResult, ToolError>;
}
