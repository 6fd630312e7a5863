//! The capability registry.

use crate::agent::AgentConfig;
use crate::flow::Flow;
use crate::registry::{CapabilityKind, RegistryError};
use crate::tool::ToolSpec;
use std::collections::HashMap;

/// Holds the named tool specs, agent configs, and flows of one process.
///
/// Names are the only identity: each namespace rejects duplicates and a
/// failed registration never overwrites the original. Registration is
/// expected to happen once at startup from a single thread; afterwards
/// the registry is read-only (`&self` lookups), so sharing it behind an
/// `Arc` is safe for concurrent execution.
///
/// # Example
///
/// ```
/// use aok::agent::AgentConfig;
/// use aok::registry::CapabilityRegistry;
///
/// let mut registry = CapabilityRegistry::new();
/// registry
///     .register_agent(AgentConfig::new("scout", "Finds things"))
///     .unwrap();
///
/// assert!(registry.has_agent("scout"));
/// assert!(registry.register_agent(AgentConfig::new("scout", "dup")).is_err());
/// ```
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    tools: HashMap<String, ToolSpec>,
    agents: HashMap<String, AgentConfig>,
    flows: HashMap<String, Flow>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool spec.
    pub fn register_tool(&mut self, spec: ToolSpec) -> Result<(), RegistryError> {
        let name = spec.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::duplicate_name(CapabilityKind::Tool, name));
        }
        self.tools.insert(name, spec);
        Ok(())
    }

    /// Register an agent config.
    pub fn register_agent(&mut self, config: AgentConfig) -> Result<(), RegistryError> {
        if self.agents.contains_key(&config.name) {
            return Err(RegistryError::duplicate_name(
                CapabilityKind::Agent,
                &config.name,
            ));
        }
        self.agents.insert(config.name.clone(), config);
        Ok(())
    }

    /// Register a flow.
    pub fn register_flow(&mut self, flow: Flow) -> Result<(), RegistryError> {
        if self.flows.contains_key(flow.name()) {
            return Err(RegistryError::duplicate_name(
                CapabilityKind::Flow,
                flow.name(),
            ));
        }
        self.flows.insert(flow.name().to_string(), flow);
        Ok(())
    }

    /// Look up a tool spec.
    pub fn get_tool(&self, name: &str) -> Result<&ToolSpec, RegistryError> {
        self.tools
            .get(name)
            .ok_or_else(|| RegistryError::not_found(CapabilityKind::Tool, name))
    }

    /// Look up an agent config.
    pub fn get_agent_config(&self, name: &str) -> Result<&AgentConfig, RegistryError> {
        self.agents
            .get(name)
            .ok_or_else(|| RegistryError::not_found(CapabilityKind::Agent, name))
    }

    /// Look up a flow.
    pub fn get_flow(&self, name: &str) -> Result<&Flow, RegistryError> {
        self.flows
            .get(name)
            .ok_or_else(|| RegistryError::not_found(CapabilityKind::Flow, name))
    }

    /// Whether a tool with this name is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Whether an agent with this name is registered.
    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Whether a flow with this name is registered.
    pub fn has_flow(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    /// All registered tool names, sorted.
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All registered agent names, sorted.
    pub fn agent_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All registered flow names, sorted.
    pub fn flow_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolDefinition;
    use serde_json::json;

    fn tool(name: &str) -> ToolSpec {
        ToolSpec::from_fn(ToolDefinition::new_simple(name, "a test tool"), |_| {
            Ok(json!("ok"))
        })
    }

    #[test]
    fn test_register_then_get() {
        let mut registry = CapabilityRegistry::new();
        registry.register_tool(tool("search")).unwrap();
        registry
            .register_agent(AgentConfig::new("scout", "d"))
            .unwrap();
        registry.register_flow(Flow::new("pipeline")).unwrap();

        assert_eq!(registry.get_tool("search").unwrap().name(), "search");
        assert_eq!(registry.get_agent_config("scout").unwrap().name, "scout");
        assert_eq!(registry.get_flow("pipeline").unwrap().name(), "pipeline");
    }

    #[test]
    fn test_get_missing_fails() {
        let registry = CapabilityRegistry::new();
        assert!(matches!(
            registry.get_tool("missing"),
            Err(RegistryError::NotFound {
                kind: CapabilityKind::Tool,
                ..
            })
        ));
        assert!(registry.get_agent_config("missing").is_err());
        assert!(registry.get_flow("missing").is_err());
    }

    #[test]
    fn test_duplicate_does_not_overwrite() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register_agent(AgentConfig::new("scout", "original"))
            .unwrap();

        let result = registry.register_agent(AgentConfig::new("scout", "replacement"));
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateName {
                kind: CapabilityKind::Agent,
                ..
            })
        ));
        assert_eq!(
            registry.get_agent_config("scout").unwrap().description,
            "original"
        );
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut registry = CapabilityRegistry::new();
        registry.register_tool(tool("shared")).unwrap();
        // Same name in another namespace is fine.
        registry
            .register_agent(AgentConfig::new("shared", "d"))
            .unwrap();
        assert!(registry.has_tool("shared"));
        assert!(registry.has_agent("shared"));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = CapabilityRegistry::new();
        registry.register_tool(tool("zeta")).unwrap();
        registry.register_tool(tool("alpha")).unwrap();
        assert_eq!(registry.tool_names(), vec!["alpha", "zeta"]);
    }
}
