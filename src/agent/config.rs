//! Agent configuration.

use crate::provider::GenerateConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default cap on tool-call loop iterations per agent turn.
pub const DEFAULT_MAX_TOOL_ITERATIONS: u32 = 10;

fn default_max_tool_iterations() -> u32 {
    DEFAULT_MAX_TOOL_ITERATIONS
}

/// Immutable description of an agent.
///
/// Registered once in a [`CapabilityRegistry`](crate::registry::CapabilityRegistry)
/// and never mutated afterwards; the engine derives
/// [`AgentInstance`](crate::agent::AgentInstance)s from it per execution
/// context. Model and memory overrides are registered names, resolved
/// through the precedence chain at instantiation time, which keeps the
/// config fully serializable.
///
/// # Example
///
/// ```
/// use aok::agent::AgentConfig;
///
/// let config = AgentConfig::new("researcher", "Finds sources")
///     .with_system_prompt("You are {agent_name}. Available tools: {tools}")
///     .with_tool("search")
///     .with_callable_agent("summarizer")
///     .with_max_tool_iterations(5);
///
/// assert_eq!(config.tools, vec!["search".to_string()]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique name within a registry.
    pub name: String,

    /// Human-readable description, also shown to callers that use this
    /// agent as a tool.
    #[serde(default)]
    pub description: String,

    /// System-prompt template; `{name}` placeholders are substituted from
    /// [`prompt_variables`](Self::prompt_variables) plus the built-ins
    /// `agent_name` and `tools`. Missing variables render as the empty
    /// string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Values substituted into the system-prompt template.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub prompt_variables: HashMap<String, String>,

    /// Names of registered tools this agent may invoke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Names of registered agents this agent may call as tools.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callable_agents: Vec<String>,

    /// Agent-level model-binding override (registered binding name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Agent-level memory-factory override (registered factory name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    /// Cap on tool-call loop iterations per turn.
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,

    /// Strip `<think>...</think>` sections from the final output.
    #[serde(default)]
    pub strip_reasoning: bool,

    /// Generation parameters forwarded to the model binding.
    #[serde(default)]
    pub generation: GenerateConfig,
}

impl AgentConfig {
    /// Create a config with defaults for everything but name and
    /// description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_prompt: None,
            prompt_variables: HashMap::new(),
            tools: Vec::new(),
            callable_agents: Vec::new(),
            model: None,
            memory: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            strip_reasoning: false,
            generation: GenerateConfig::default(),
        }
    }

    /// Set the system-prompt template.
    pub fn with_system_prompt(mut self, template: impl Into<String>) -> Self {
        self.system_prompt = Some(template.into());
        self
    }

    /// Add a prompt-template variable.
    pub fn with_prompt_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.prompt_variables.insert(key.into(), value.into());
        self
    }

    /// Allow a registered tool.
    pub fn with_tool(mut self, name: impl Into<String>) -> Self {
        self.tools.push(name.into());
        self
    }

    /// Allow calling another registered agent as a tool.
    pub fn with_callable_agent(mut self, name: impl Into<String>) -> Self {
        self.callable_agents.push(name.into());
        self
    }

    /// Override the model binding by registered name.
    pub fn with_model(mut self, name: impl Into<String>) -> Self {
        self.model = Some(name.into());
        self
    }

    /// Override the memory factory by registered name.
    pub fn with_memory(mut self, name: impl Into<String>) -> Self {
        self.memory = Some(name.into());
        self
    }

    /// Set the tool-call loop cap.
    pub fn with_max_tool_iterations(mut self, limit: u32) -> Self {
        self.max_tool_iterations = limit;
        self
    }

    /// Enable or disable reasoning-section stripping.
    pub fn with_strip_reasoning(mut self, strip: bool) -> Self {
        self.strip_reasoning = strip;
        self
    }

    /// Set the generation parameters.
    pub fn with_generation(mut self, generation: GenerateConfig) -> Self {
        self.generation = generation;
        self
    }
}
