//! Declarative setup: agents and flows from a TOML document.
//!
//! Code-level concerns (model bindings, native tool handlers, pattern
//! construction) stay in code; the TOML surface covers what is naturally
//! data, which is agent configs and simple agent-sequence flows.

use crate::agent::AgentConfig;
use crate::flow::Flow;
use crate::registry::{CapabilityRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading an [`OrchestratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A flow declared as a plain sequence of agent names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowDecl {
    /// The flow's registry name.
    pub name: String,

    /// Agent names, executed in order.
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Root of the TOML document.
///
/// # Example
///
/// ```
/// use aok::config::OrchestratorConfig;
///
/// let config = OrchestratorConfig::from_toml_str(r#"
///     default_model = "gpt"
///
///     [[agents]]
///     name = "scout"
///     description = "Finds sources"
///     tools = ["search"]
///
///     [[flows]]
///     name = "research"
///     steps = ["scout"]
/// "#).unwrap();
///
/// assert_eq!(config.agents.len(), 1);
/// assert_eq!(config.default_model.as_deref(), Some("gpt"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Name for [`Engine::set_default_model`](crate::engine::Engine::set_default_model).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Agent definitions to register.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,

    /// Flow definitions to register.
    #[serde(default)]
    pub flows: Vec<FlowDecl>,
}

impl OrchestratorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Register every declared agent and flow.
    ///
    /// Duplicate names (within the document or against prior
    /// registrations) fail just like programmatic registration does.
    pub fn apply(&self, registry: &mut CapabilityRegistry) -> Result<(), RegistryError> {
        for agent in &self.agents {
            registry.register_agent(agent.clone())?;
        }
        for decl in &self.flows {
            let mut flow = Flow::new(&decl.name);
            for step in &decl.steps {
                flow.add_step(step.as_str());
            }
            registry.register_flow(flow)?;
        }
        info!(
            agents = self.agents.len(),
            flows = self.flows.len(),
            "configuration applied"
        );
        Ok(())
    }

    /// Build a fresh registry from this document.
    pub fn build_registry(&self) -> Result<CapabilityRegistry, RegistryError> {
        let mut registry = CapabilityRegistry::new();
        self.apply(&mut registry)?;
        Ok(registry)
    }
}
