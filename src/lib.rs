//! Agent Orchestration Kit (AOK) - composable runtime for LLM agent systems
//!
//! AOK lets you register capabilities once and compose them into
//! multi-agent workflows:
//!
//! - **`registry`** - Named tools, agents, and flows
//! - **`agent`** - Agent configuration and live instances
//! - **`provider`** - Model binding trait, message types, and test mocks
//! - **`tool`** - Tool definitions and native/agent-backed handlers
//! - **`memory`** - Conversation stores and factories
//! - **`engine`** - Agent instantiation, the tool-call loop, and flow runs
//! - **`pattern`** - Sequential, parallel, router, and discussion topologies
//! - **`flow`** - Ordered step compositions and their running context
//! - **`config`** - Declarative TOML setup for agents and flows
//!
//! # Example: one agent, one flow
//!
//! ```
//! use std::sync::Arc;
//! use aok::prelude::*;
//! use aok::provider::mock::EchoModel;
//!
//! # tokio_test::block_on(async {
//! let mut registry = CapabilityRegistry::new();
//! registry.register_agent(AgentConfig::new("scout", "Finds things")).unwrap();
//! registry.register_agent(AgentConfig::new("writer", "Writes things")).unwrap();
//! registry
//!     .register_flow(Flow::new("pipeline").with_step("scout").with_step("writer"))
//!     .unwrap();
//!
//! let mut engine = Engine::new(Arc::new(registry));
//! engine.register_model("echo", Arc::new(EchoModel::default()));
//! engine.set_default_model("echo");
//!
//! let ctx = engine.run_flow("pipeline", Message::user("go"), None).await.unwrap();
//! assert_eq!(ctx.current_message.text(), "processed:processed:go");
//! # });
//! ```
//!
//! # Example: a native tool
//!
//! ```
//! use aok::tool::{ToolDefinition, ToolSpec};
//! use serde_json::json;
//!
//! let definition = ToolDefinition::new(
//!     "word_count",
//!     "Counts words in the input text",
//!     json!({
//!         "type": "object",
//!         "properties": { "text": { "type": "string" } },
//!         "required": ["text"]
//!     }),
//! );
//! let spec = ToolSpec::from_fn(definition, |args| {
//!     let text = args["text"].as_str().unwrap_or_default();
//!     Ok(json!(text.split_whitespace().count()))
//! });
//! assert_eq!(spec.name(), "word_count");
//! ```

#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod engine;
pub mod flow;
pub mod memory;
pub mod pattern;
pub mod provider;
pub mod registry;
pub mod text;
pub mod tool;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agent::{AgentConfig, AgentInstance};
    pub use crate::config::OrchestratorConfig;
    pub use crate::engine::{CallOverrides, Engine, EngineError, ExecutionContext};
    pub use crate::flow::{Flow, FlowContext, FlowStep};
    pub use crate::memory::{InMemoryFactory, InMemoryStore, MemoryFactory, MemoryStore};
    pub use crate::pattern::{
        DiscussionPattern, ParallelPattern, Pattern, RouterPattern, SequentialPattern,
    };
    pub use crate::provider::{
        GenerateConfig, Message, ModelBinding, ModelError, ModelResponse, Role,
        ToolCallRequest,
    };
    pub use crate::registry::{CapabilityRegistry, RegistryError};
    pub use crate::tool::{ToolDefinition, ToolHandler, ToolSpec};
}
