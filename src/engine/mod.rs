//! The execution engine.
//!
//! The engine instantiates agents on demand (resolving model binding,
//! memory store, and tool set through the override precedence chain) and
//! drives the agent turn: render system prompt, call the model, execute
//! requested tool calls, feed results back, repeat until the model stops
//! asking for tools or the iteration cap is hit.

pub mod context;
pub mod error;

pub use context::{CallOverrides, ExecutionContext};
pub use error::EngineError;

use crate::agent::{AgentConfig, AgentInstance};
use crate::flow::FlowContext;
use crate::memory::{InMemoryFactory, MemoryFactory};
use crate::provider::{Message, ModelBinding, ModelResponse, ToolCallRequest};
use crate::registry::CapabilityRegistry;
use crate::text;
use crate::tool::{ToolBackend, ToolDefinition};
use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reserved meta-tool: list the tools available to the calling agent.
pub const META_LIST_TOOLS: &str = "list_tools";

/// Reserved meta-tool: list every registered agent.
pub const META_LIST_AGENTS: &str = "list_agents";

/// Marker appended to an agent's output when the tool-call loop hit its
/// iteration cap. The turn still succeeds: partial output is usually
/// better than none, so this is surfaced as a marker plus a warning log
/// rather than an error.
pub const ITERATION_LIMIT_MARKER: &str = "[tool iteration limit reached]";

/// Instantiates agents and drives their turns.
///
/// The engine is read-only during execution (`&self` everywhere), so one
/// engine serves concurrent flow runs and parallel branches. Model
/// bindings and memory factories are registered by name; agent configs
/// and call overrides reference those names, and the engine resolves them
/// through the precedence chain at instantiation time.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use aok::agent::AgentConfig;
/// use aok::engine::Engine;
/// use aok::provider::mock::EchoModel;
/// use aok::provider::Message;
/// use aok::registry::CapabilityRegistry;
///
/// # tokio_test::block_on(async {
/// let mut registry = CapabilityRegistry::new();
/// registry.register_agent(AgentConfig::new("scout", "d")).unwrap();
///
/// let mut engine = Engine::new(Arc::new(registry));
/// engine.register_model("echo", Arc::new(EchoModel::default()));
/// engine.set_default_model("echo");
///
/// let reply = engine.call_agent("scout", Message::user("hi"), None).await.unwrap();
/// assert_eq!(reply.text(), "processed:hi");
/// # });
/// ```
pub struct Engine {
    registry: Arc<CapabilityRegistry>,
    models: HashMap<String, Arc<dyn ModelBinding>>,
    memories: HashMap<String, Arc<dyn MemoryFactory>>,
    default_model: Option<String>,
    default_memory: Arc<dyn MemoryFactory>,
}

impl Engine {
    /// Create an engine over a registry.
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            registry,
            models: HashMap::new(),
            memories: HashMap::new(),
            default_model: None,
            default_memory: Arc::new(InMemoryFactory),
        }
    }

    /// Register a model binding under a name.
    pub fn register_model(
        &mut self,
        name: impl Into<String>,
        binding: Arc<dyn ModelBinding>,
    ) -> &mut Self {
        self.models.insert(name.into(), binding);
        self
    }

    /// Register a memory factory under a name.
    pub fn register_memory(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn MemoryFactory>,
    ) -> &mut Self {
        self.memories.insert(name.into(), factory);
        self
    }

    /// Set the process-wide default model binding (lowest precedence).
    pub fn set_default_model(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_model = Some(name.into());
        self
    }

    /// Replace the process-wide default memory factory (initially the
    /// volatile in-memory store).
    pub fn set_default_memory(&mut self, factory: Arc<dyn MemoryFactory>) -> &mut Self {
        self.default_memory = factory;
        self
    }

    /// The registry this engine executes against.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Run one agent turn in a fresh execution context.
    ///
    /// Fails with a registry error if the name is unknown, with
    /// [`EngineError::NoModelBinding`] if the precedence chain yields
    /// nothing, and with a model error if the binding fails. Hitting the
    /// tool-iteration cap is a soft failure: the reply text carries
    /// [`ITERATION_LIMIT_MARKER`].
    pub async fn call_agent(
        &self,
        name: &str,
        input: Message,
        overrides: Option<CallOverrides>,
    ) -> Result<Message, EngineError> {
        let mut exec = ExecutionContext::from_overrides(overrides.unwrap_or_default());
        self.call_agent_in(&mut exec, name, input, None).await
    }

    /// Run one agent turn inside an existing execution context.
    ///
    /// Patterns use this so that all steps of one run share the same
    /// instance cache and cancellation token. `overrides` takes
    /// precedence over the context's own overrides; passing an override
    /// with a model or memory set bypasses (and replaces) any cached
    /// instance for this agent.
    pub async fn call_agent_in(
        &self,
        exec: &mut ExecutionContext,
        name: &str,
        input: Message,
        overrides: Option<&CallOverrides>,
    ) -> Result<Message, EngineError> {
        let config = self.registry.get_agent_config(name)?.clone();
        let wants_fresh = overrides
            .map(|o| o.model.is_some() || o.memory.is_some())
            .unwrap_or(false);

        let mut instance = match exec.take_instance(name) {
            Some(instance) if !wants_fresh => instance,
            _ => self.instantiate(exec, &config, overrides)?,
        };

        let result = self.run_turn(exec, &mut instance, input).await;
        exec.store_instance(name, instance);
        result
    }

    /// Execute a registered flow.
    ///
    /// Returns the final [`FlowContext`]. Sequential and router failures
    /// propagate from the first failing step; parallel steps aggregate
    /// branch failures into the context instead (see
    /// [`ParallelPattern`](crate::pattern::ParallelPattern)).
    pub async fn run_flow(
        &self,
        name: &str,
        input: Message,
        overrides: Option<CallOverrides>,
    ) -> Result<FlowContext, EngineError> {
        let flow = self.registry.get_flow(name)?;
        let mut exec = ExecutionContext::from_overrides(overrides.unwrap_or_default());
        info!(flow = name, run_id = %exec.run_id(), steps = flow.len(), "flow started");
        let result = flow.execute(input, self, &mut exec).await;
        match &result {
            Ok(ctx) => {
                info!(flow = name, run_id = %exec.run_id(), history = ctx.history.len(), "flow completed")
            }
            Err(error) => warn!(flow = name, run_id = %exec.run_id(), %error, "flow failed"),
        }
        result
    }

    fn instantiate(
        &self,
        exec: &ExecutionContext,
        config: &AgentConfig,
        overrides: Option<&CallOverrides>,
    ) -> Result<AgentInstance, EngineError> {
        let model = self.resolve_model(exec, config, overrides)?;
        let memory = self.resolve_memory(exec, config, overrides)?;
        debug!(agent = %config.name, binding = model.binding_name(), "agent instantiated");
        Ok(AgentInstance::new(config.clone(), model, memory.create()))
    }

    /// Resolve the model binding for an agent, highest precedence first:
    /// explicit per-call override, the context's run overrides, the
    /// agent-level override, the context default, then the engine-wide
    /// default.
    fn resolve_model(
        &self,
        exec: &ExecutionContext,
        config: &AgentConfig,
        overrides: Option<&CallOverrides>,
    ) -> Result<Arc<dyn ModelBinding>, EngineError> {
        let name = overrides
            .and_then(|o| o.model.as_deref())
            .or(exec.overrides().model.as_deref())
            .or(config.model.as_deref())
            .or(exec.model_default())
            .or(self.default_model.as_deref());
        let Some(name) = name else {
            return Err(EngineError::no_model_binding(&config.name));
        };
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownModelBinding {
                name: name.to_string(),
            })
    }

    fn resolve_memory(
        &self,
        exec: &ExecutionContext,
        config: &AgentConfig,
        overrides: Option<&CallOverrides>,
    ) -> Result<Arc<dyn MemoryFactory>, EngineError> {
        let name = overrides
            .and_then(|o| o.memory.as_deref())
            .or(exec.overrides().memory.as_deref())
            .or(config.memory.as_deref())
            .or(exec.memory_default());
        match name {
            Some(name) => {
                self.memories
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownMemoryFactory {
                        name: name.to_string(),
                    })
            }
            None => Ok(self.default_memory.clone()),
        }
    }

    async fn run_turn(
        &self,
        exec: &mut ExecutionContext,
        instance: &mut AgentInstance,
        input: Message,
    ) -> Result<Message, EngineError> {
        let agent = instance.config.name.clone();
        instance.memory.append(input);

        let system_prompt = self.render_system_prompt(&instance.config);
        let tool_defs = self.tool_definitions(&instance.config)?;
        let iteration_cap = instance.config.max_tool_iterations.max(1);
        let mut last_text = String::new();

        for iteration in 1..=iteration_cap {
            if exec.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let mut messages = Vec::with_capacity(instance.memory.len() + 1);
            if let Some(prompt) = &system_prompt {
                messages.push(Message::system(prompt.clone()));
            }
            messages.extend(instance.memory.read(None, None));

            debug!(agent = %agent, iteration, tools = tool_defs.len(), "model call");
            let response = tokio::select! {
                _ = exec.cancellation().cancelled() => return Err(EngineError::Cancelled),
                response = instance.model.complete(
                    messages,
                    &tool_defs,
                    &instance.config.generation,
                ) => response?,
            };

            match response {
                ModelResponse::Content(content) => {
                    let reply =
                        Message::assistant(finalize_text(&instance.config, content));
                    instance.memory.append(reply.clone());
                    return Ok(reply);
                }
                ModelResponse::ToolCalls { content, calls } => {
                    if let Some(text) = &content {
                        if !text.is_empty() {
                            last_text = text.clone();
                        }
                    }
                    instance
                        .memory
                        .append(Message::assistant_with_tool_calls(content, calls.clone()));
                    for call in calls {
                        let result = self
                            .route_tool_call(exec, &instance.config, &call)
                            .await?;
                        instance
                            .memory
                            .append(Message::tool(result, call.id, call.name));
                    }
                }
            }
        }

        warn!(agent = %agent, cap = iteration_cap, "tool iteration limit reached, returning partial output");
        let text = if last_text.is_empty() {
            ITERATION_LIMIT_MARKER.to_string()
        } else {
            format!("{last_text}\n{ITERATION_LIMIT_MARKER}")
        };
        let reply = Message::assistant(finalize_text(&instance.config, text));
        instance.memory.append(reply.clone());
        Ok(reply)
    }

    /// Route one tool call, in fixed order: reserved meta-tools, then
    /// natively registered tools the agent is allowed to use, then
    /// callable agents. Native handler failures become tool-result error
    /// text; sub-agent failures (which include model errors) propagate.
    async fn route_tool_call(
        &self,
        exec: &mut ExecutionContext,
        config: &AgentConfig,
        call: &ToolCallRequest,
    ) -> Result<String, EngineError> {
        if let Some(result) = self.answer_meta_tool(config, &call.name) {
            debug!(agent = %config.name, tool = %call.name, "meta-tool answered");
            return Ok(result);
        }

        if config.tools.iter().any(|t| t == &call.name) {
            let spec = self.registry.get_tool(&call.name)?;
            match &spec.backend {
                ToolBackend::Native(handler) => {
                    let handler = handler.clone();
                    return Ok(match handler.invoke(call.arguments.clone()).await {
                        Ok(value) => render_tool_value(value),
                        Err(error) => {
                            warn!(agent = %config.name, tool = %call.name, %error, "tool execution failed");
                            format!("error: tool '{}' failed: {error:#}", call.name)
                        }
                    });
                }
                ToolBackend::Agent(target) => {
                    let target = target.clone();
                    return self.call_sub_agent(exec, &target, call).await;
                }
            }
        }

        if config.callable_agents.iter().any(|a| a == &call.name) {
            return self.call_sub_agent(exec, &call.name, call).await;
        }

        warn!(agent = %config.name, tool = %call.name, "model requested unknown tool");
        Ok(format!("error: unknown tool '{}'", call.name))
    }

    async fn call_sub_agent(
        &self,
        exec: &mut ExecutionContext,
        target: &str,
        call: &ToolCallRequest,
    ) -> Result<String, EngineError> {
        let input = Message::user(sub_agent_input(&call.arguments));
        let reply = self.call_agent_dyn(exec, target, input).await?;
        Ok(reply.text().to_string())
    }

    // Indirection through a boxed dyn future: agent turns recurse when an
    // agent calls another agent as a tool.
    fn call_agent_dyn<'a>(
        &'a self,
        exec: &'a mut ExecutionContext,
        name: &'a str,
        input: Message,
    ) -> BoxFuture<'a, Result<Message, EngineError>> {
        Box::pin(self.call_agent_in(exec, name, input, None))
    }

    fn answer_meta_tool(&self, config: &AgentConfig, name: &str) -> Option<String> {
        match name {
            META_LIST_TOOLS => {
                let mut names: Vec<&str> = config
                    .tools
                    .iter()
                    .chain(config.callable_agents.iter())
                    .map(String::as_str)
                    .collect();
                names.sort_unstable();
                Some(names.join(", "))
            }
            META_LIST_AGENTS => Some(self.registry.agent_names().join(", ")),
            _ => None,
        }
    }

    fn tool_definitions(
        &self,
        config: &AgentConfig,
    ) -> Result<Vec<ToolDefinition>, EngineError> {
        let mut defs = Vec::with_capacity(config.tools.len() + config.callable_agents.len());
        for name in &config.tools {
            defs.push(self.registry.get_tool(name)?.definition.clone());
        }
        for agent in &config.callable_agents {
            let target = self.registry.get_agent_config(agent)?;
            defs.push(agent_tool_definition(target));
        }
        Ok(defs)
    }

    fn render_system_prompt(&self, config: &AgentConfig) -> Option<String> {
        let template = config.system_prompt.as_deref()?;
        let mut variables = config.prompt_variables.clone();
        variables
            .entry("agent_name".to_string())
            .or_insert_with(|| config.name.clone());
        variables.entry("tools".to_string()).or_insert_with(|| {
            config
                .tools
                .iter()
                .chain(config.callable_agents.iter())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        });
        Some(text::render_template(template, &variables))
    }
}

/// Synthetic tool definition advertising a callable agent to the model.
fn agent_tool_definition(config: &AgentConfig) -> ToolDefinition {
    ToolDefinition::new(
        &config.name,
        format!("Delegate to the '{}' agent. {}", config.name, config.description),
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Input message for the agent"
                }
            },
            "required": ["message"]
        }),
    )
}

/// Input message for a sub-agent call: the `message` argument when
/// present, otherwise the raw JSON arguments.
fn sub_agent_input(arguments: &Value) -> String {
    arguments
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| arguments.to_string())
}

fn render_tool_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn finalize_text(config: &AgentConfig, content: String) -> String {
    if config.strip_reasoning {
        text::strip_reasoning(&content)
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{EchoModel, ScriptedModel};

    fn engine_with(agents: Vec<AgentConfig>) -> Engine {
        let mut registry = CapabilityRegistry::new();
        for agent in agents {
            registry.register_agent(agent).unwrap();
        }
        Engine::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_call_agent_unknown_name() {
        let mut engine = engine_with(vec![]);
        engine.register_model("echo", Arc::new(EchoModel::default()));
        engine.set_default_model("echo");

        let result = engine.call_agent("ghost", Message::user("hi"), None).await;
        assert!(matches!(result, Err(EngineError::Registry(_))));
    }

    #[tokio::test]
    async fn test_no_model_binding_at_any_level() {
        let engine = engine_with(vec![AgentConfig::new("scout", "d")]);
        let result = engine.call_agent("scout", Message::user("hi"), None).await;
        assert!(
            matches!(result, Err(EngineError::NoModelBinding { agent }) if agent == "scout")
        );
    }

    #[tokio::test]
    async fn test_unknown_model_binding_name() {
        let mut engine = engine_with(vec![AgentConfig::new("scout", "d").with_model("ghost")]);
        engine.register_model("echo", Arc::new(EchoModel::default()));

        let result = engine.call_agent("scout", Message::user("hi"), None).await;
        assert!(
            matches!(result, Err(EngineError::UnknownModelBinding { name }) if name == "ghost")
        );
    }

    #[tokio::test]
    async fn test_system_prompt_rendered_with_builtins() {
        let model = Arc::new(ScriptedModel::new());
        let mut engine = engine_with(vec![AgentConfig::new("scout", "d")
            .with_system_prompt("I am {agent_name}; tools: {tools}; extra: {missing}")]);
        engine.register_model("m", model.clone());
        engine.set_default_model("m");

        engine
            .call_agent("scout", Message::user("hi"), None)
            .await
            .unwrap();

        let request = &model.requests()[0];
        assert_eq!(request[0].role, crate::provider::Role::System);
        assert_eq!(request[0].text(), "I am scout; tools: ; extra: ");
    }

    #[tokio::test]
    async fn test_meta_tool_answered_without_model_round_trip() {
        let config = AgentConfig::new("scout", "d").with_callable_agent("writer");
        let engine = {
            let mut engine = engine_with(vec![config.clone(), AgentConfig::new("writer", "d")]);
            engine.register_model("m", Arc::new(ScriptedModel::new()));
            engine
        };

        assert_eq!(
            engine.answer_meta_tool(&config, META_LIST_AGENTS),
            Some("scout, writer".to_string())
        );
        assert_eq!(
            engine.answer_meta_tool(&config, META_LIST_TOOLS),
            Some("writer".to_string())
        );
        assert_eq!(engine.answer_meta_tool(&config, "other"), None);
    }

    #[tokio::test]
    async fn test_strip_reasoning_applied_to_reply() {
        let model = Arc::new(ScriptedModel::from_responses(vec![
            ModelResponse::Content("<think>hmm</think>clean answer".to_string()),
        ]));
        let mut engine =
            engine_with(vec![AgentConfig::new("scout", "d").with_strip_reasoning(true)]);
        engine.register_model("m", model);
        engine.set_default_model("m");

        let reply = engine
            .call_agent("scout", Message::user("hi"), None)
            .await
            .unwrap();
        assert_eq!(reply.text(), "clean answer");
    }

    #[test]
    fn test_sub_agent_input_extraction() {
        assert_eq!(sub_agent_input(&json!({"message": "do it"})), "do it");
        assert_eq!(sub_agent_input(&json!({"other": 1})), r#"{"other":1}"#);
    }

    #[test]
    fn test_render_tool_value() {
        assert_eq!(render_tool_value(json!("plain")), "plain");
        assert_eq!(render_tool_value(json!({"k": 1})), r#"{"k":1}"#);
    }
}
