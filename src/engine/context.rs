//! Per-call overrides and per-run execution state.

use crate::agent::AgentInstance;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Overrides passed to `call_agent` or `run_flow`.
///
/// These sit at the top of the resolution precedence chain. Bindings and
/// factories are referenced by registered name.
#[derive(Clone, Debug, Default)]
pub struct CallOverrides {
    /// Model binding to use, by registered name.
    pub model: Option<String>,

    /// Memory factory to use, by registered name.
    pub memory: Option<String>,

    /// Caller-supplied cancellation token. When triggered, no new
    /// tool-loop iterations or parallel branches start, and in-flight
    /// model calls are abandoned.
    pub cancel: Option<CancellationToken>,
}

impl CallOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
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

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Mutable state for one top-level `call_agent` or `run_flow` invocation.
///
/// Owns the per-run agent-instance cache: instances are created lazily
/// and cached here only, so concurrent runs (and parallel branches, which
/// get a [`branch`](ExecutionContext::branch)) never share conversational
/// state.
#[derive(Debug)]
pub struct ExecutionContext {
    run_id: Uuid,
    overrides: CallOverrides,
    model_default: Option<String>,
    memory_default: Option<String>,
    instances: HashMap<String, AgentInstance>,
    cancel: CancellationToken,
}

impl ExecutionContext {
    /// Create a context with no overrides.
    pub fn new() -> Self {
        Self::from_overrides(CallOverrides::default())
    }

    /// Create a context carrying per-call overrides.
    pub fn from_overrides(overrides: CallOverrides) -> Self {
        let cancel = overrides.cancel.clone().unwrap_or_default();
        Self {
            run_id: Uuid::new_v4(),
            overrides,
            model_default: None,
            memory_default: None,
            instances: HashMap::new(),
            cancel,
        }
    }

    /// Set the context-level model-binding default (below agent-level
    /// overrides, above the engine-wide default).
    pub fn set_model_default(&mut self, name: impl Into<String>) {
        self.model_default = Some(name.into());
    }

    /// Set the context-level memory-factory default.
    pub fn set_memory_default(&mut self, name: impl Into<String>) {
        self.memory_default = Some(name.into());
    }

    /// Unique id of this run, used in log fields.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The per-call overrides this context was created with.
    pub fn overrides(&self) -> &CallOverrides {
        &self.overrides
    }

    /// Context-level model default, if set.
    pub fn model_default(&self) -> Option<&str> {
        self.model_default.as_deref()
    }

    /// Context-level memory default, if set.
    pub fn memory_default(&self) -> Option<&str> {
        self.memory_default.as_deref()
    }

    /// This run's cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Derive a context for a parallel branch: same defaults and
    /// overrides, an empty instance cache, and a child cancellation
    /// token.
    pub fn branch(&self) -> Self {
        Self {
            run_id: self.run_id,
            overrides: self.overrides.clone(),
            model_default: self.model_default.clone(),
            memory_default: self.memory_default.clone(),
            instances: HashMap::new(),
            cancel: self.cancel.child_token(),
        }
    }

    /// Inspect a cached instance.
    pub fn instance(&self, name: &str) -> Option<&AgentInstance> {
        self.instances.get(name)
    }

    /// Names of agents instantiated in this context.
    pub fn cached_agents(&self) -> Vec<&str> {
        self.instances.keys().map(String::as_str).collect()
    }

    pub(crate) fn take_instance(&mut self, name: &str) -> Option<AgentInstance> {
        self.instances.remove(name)
    }

    pub(crate) fn store_instance(&mut self, name: impl Into<String>, instance: AgentInstance) {
        self.instances.insert(name.into(), instance);
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
