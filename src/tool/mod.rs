//! Tool specifications and backends.
//!
//! A [`ToolSpec`] pairs a schema-described [`ToolDefinition`] (what the
//! model sees) with a [`ToolBackend`] (what the engine invokes). The
//! backend is a closed tagged union: either a native async handler or a
//! reference to another registered agent, so agent-as-tool routing is a
//! plain match instead of name sniffing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Schema-level description of a tool, as presented to the model.
///
/// # Example
///
/// ```
/// use aok::tool::ToolDefinition;
/// use serde_json::json;
///
/// let def = ToolDefinition::new(
///     "read_file",
///     "Read the contents of a file",
///     json!({
///         "type": "object",
///         "properties": {
///             "path": { "type": "string", "description": "File path to read" }
///         },
///         "required": ["path"]
///     }),
/// );
///
/// let schema = def.to_function_schema();
/// assert_eq!(schema["function"]["name"], "read_file");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name within a registry.
    pub name: String,

    /// Human-readable description for LLM consumption.
    pub description: String,

    /// JSON Schema describing the accepted parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Create a definition with an empty parameter object.
    pub fn new_simple(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    /// Render an OpenAI-style function calling schema.
    pub fn to_function_schema(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    /// Whether any parameters are declared.
    pub fn has_parameters(&self) -> bool {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| !props.is_empty())
            .unwrap_or(false)
    }
}

/// A native tool implementation.
///
/// Handlers may fail; the engine captures the error as a tool-role
/// message instead of propagating it, so the driving model can react.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool with JSON arguments.
    async fn invoke(&self, arguments: Value) -> anyhow::Result<Value>;
}

struct FnHandler<F>(F);

#[async_trait::async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync,
{
    async fn invoke(&self, arguments: Value) -> anyhow::Result<Value> {
        (self.0)(arguments)
    }
}

/// What the engine invokes when the model requests a tool by name.
#[derive(Clone)]
pub enum ToolBackend {
    /// A native in-process implementation.
    Native(Arc<dyn ToolHandler>),
    /// Another registered agent; the tool arguments become its input.
    Agent(String),
}

impl fmt::Debug for ToolBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolBackend::Native(_) => f.write_str("Native(..)"),
            ToolBackend::Agent(name) => write!(f, "Agent({name})"),
        }
    }
}

/// A registered tool: definition plus backend.
#[derive(Clone, Debug)]
pub struct ToolSpec {
    /// Schema presented to the model.
    pub definition: ToolDefinition,
    /// Implementation invoked by the engine.
    pub backend: ToolBackend,
}

impl ToolSpec {
    /// Create a tool backed by a native handler.
    pub fn native(definition: ToolDefinition, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            definition,
            backend: ToolBackend::Native(handler),
        }
    }

    /// Create a tool backed by a synchronous closure.
    pub fn from_fn<F>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::native(definition, Arc::new(FnHandler(handler)))
    }

    /// Create a tool that delegates to another registered agent.
    pub fn agent_backed(definition: ToolDefinition, agent: impl Into<String>) -> Self {
        Self {
            definition,
            backend: ToolBackend::Agent(agent.into()),
        }
    }

    /// The tool's registry name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_schema() {
        let def = ToolDefinition::new(
            "get_weather",
            "Get current weather",
            json!({
                "type": "object",
                "properties": { "city": { "type": "string" } },
                "required": ["city"]
            }),
        );

        let schema = def.to_function_schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "get_weather");
        assert_eq!(
            schema["function"]["parameters"]["properties"]["city"]["type"],
            "string"
        );
    }

    #[test]
    fn test_has_parameters() {
        let with = ToolDefinition::new(
            "t",
            "d",
            json!({"type": "object", "properties": {"x": {"type": "number"}}}),
        );
        assert!(with.has_parameters());

        let without = ToolDefinition::new_simple("t2", "d");
        assert!(!without.has_parameters());

        let null = ToolDefinition::new("t3", "d", json!(null));
        assert!(!null.has_parameters());
    }

    #[tokio::test]
    async fn test_from_fn_invokes_closure() {
        let spec = ToolSpec::from_fn(ToolDefinition::new_simple("double", "Double x"), |args| {
            let x = args["x"].as_i64().unwrap_or(0);
            Ok(json!(x * 2))
        });

        match &spec.backend {
            ToolBackend::Native(handler) => {
                let result = handler.invoke(json!({"x": 21})).await.unwrap();
                assert_eq!(result, json!(42));
            }
            ToolBackend::Agent(_) => panic!("expected native backend"),
        }
    }

    #[test]
    fn test_agent_backed() {
        let spec = ToolSpec::agent_backed(ToolDefinition::new_simple("summarize", "d"), "writer");
        assert!(matches!(&spec.backend, ToolBackend::Agent(name) if name == "writer"));
        assert_eq!(spec.name(), "summarize");
    }

    #[test]
    fn test_backend_debug() {
        let spec = ToolSpec::agent_backed(ToolDefinition::new_simple("t", "d"), "a");
        assert_eq!(format!("{:?}", spec.backend), "Agent(a)");
    }

    #[test]
    fn test_definition_serde_roundtrip() {
        let def = ToolDefinition::new_simple("ping", "Check liveness");
        let raw = serde_json::to_string(&def).unwrap();
        let parsed: ToolDefinition = serde_json::from_str(&raw).unwrap();
        assert_eq!(def, parsed);
    }
}
