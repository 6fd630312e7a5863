//! Live agent instances.

use crate::agent::AgentConfig;
use crate::memory::MemoryStore;
use crate::provider::ModelBinding;
use std::fmt;
use std::sync::Arc;

/// A live agent: config plus resolved model binding and a private memory
/// store.
///
/// Instances are created lazily per (execution context, agent name) and
/// cached only for the lifetime of that context. They are never shared
/// across concurrent branches, which keeps each branch's conversation
/// isolated.
pub struct AgentInstance {
    /// The registered configuration this instance was derived from.
    pub config: AgentConfig,
    /// The model binding selected by the resolution chain.
    pub model: Arc<dyn ModelBinding>,
    /// This instance's private conversation memory.
    pub memory: Box<dyn MemoryStore>,
}

impl AgentInstance {
    /// Bind a config to a model and a fresh memory store.
    pub fn new(
        config: AgentConfig,
        model: Arc<dyn ModelBinding>,
        memory: Box<dyn MemoryStore>,
    ) -> Self {
        Self {
            config,
            model,
            memory,
        }
    }
}

// Manual impl: the model and memory trait objects are not Debug.
impl fmt::Debug for AgentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentInstance")
            .field("agent", &self.config.name)
            .field("binding", &self.model.binding_name())
            .field("memory_len", &self.memory.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryFactory, MemoryFactory};
    use crate::provider::mock::EchoModel;
    use crate::provider::Message;

    #[test]
    fn test_instances_have_independent_memory() {
        let config = AgentConfig::new("a", "d");
        let model = Arc::new(EchoModel::default());
        let factory = InMemoryFactory;

        let mut first = AgentInstance::new(config.clone(), model.clone(), factory.create());
        let second = AgentInstance::new(config, model, factory.create());

        first.memory.append(Message::user("only in first"));
        assert_eq!(first.memory.len(), 1);
        assert!(second.memory.is_empty());
    }
}
