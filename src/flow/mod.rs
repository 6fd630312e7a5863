//! Flows: ordered compositions of agent and pattern steps.

pub mod context;

pub use context::FlowContext;

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::pattern::Pattern;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One step of a flow: a registered agent by name, or a nested pattern.
///
/// The recursive case is boxed behind an `Arc` so steps stay cheap to
/// clone into parallel branches.
#[derive(Clone)]
pub enum FlowStep {
    /// Resolve and call a registered agent.
    Agent(String),
    /// Delegate to a composition pattern.
    Pattern(Arc<dyn Pattern>),
}

impl FlowStep {
    /// Step over a registered agent name.
    pub fn agent(name: impl Into<String>) -> Self {
        FlowStep::Agent(name.into())
    }

    /// Step over a pattern.
    pub fn pattern(pattern: impl Pattern + 'static) -> Self {
        FlowStep::Pattern(Arc::new(pattern))
    }

    /// Label for logging and parallel merge keys.
    pub fn label(&self) -> &str {
        match self {
            FlowStep::Agent(name) => name,
            FlowStep::Pattern(pattern) => pattern.name(),
        }
    }
}

impl fmt::Debug for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStep::Agent(name) => write!(f, "Agent({name})"),
            FlowStep::Pattern(pattern) => write!(f, "Pattern({})", pattern.name()),
        }
    }
}

impl From<&str> for FlowStep {
    fn from(name: &str) -> Self {
        FlowStep::Agent(name.to_string())
    }
}

impl From<String> for FlowStep {
    fn from(name: String) -> Self {
        FlowStep::Agent(name)
    }
}

impl From<Arc<dyn Pattern>> for FlowStep {
    fn from(pattern: Arc<dyn Pattern>) -> Self {
        FlowStep::Pattern(pattern)
    }
}

/// Execute one step against the running context.
///
/// Agent steps feed `ctx.current_message` into the agent and fold the
/// reply back; pattern steps delegate entirely to the pattern.
pub async fn run_step(
    step: &FlowStep,
    ctx: &mut FlowContext,
    engine: &Engine,
    exec: &mut ExecutionContext,
) -> Result<(), EngineError> {
    match step {
        FlowStep::Agent(name) => {
            let reply = engine
                .call_agent_in(exec, name, ctx.current_message.clone(), None)
                .await?;
            ctx.push(reply);
            Ok(())
        }
        FlowStep::Pattern(pattern) => pattern.execute(ctx, engine, exec).await,
    }
}

/// A named, ordered list of steps.
///
/// Registered once, executed many times; execution never mutates the
/// definition. `add_step` must only be called during setup, before the
/// flow is registered.
///
/// # Example
///
/// ```
/// use aok::flow::Flow;
///
/// let mut flow = Flow::new("pipeline");
/// flow.add_step("draft");
/// flow.add_step("review");
/// assert_eq!(flow.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Flow {
    name: String,
    steps: Vec<FlowStep>,
}

impl Flow {
    /// Create an empty flow.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// The flow's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the flow has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps in execution order.
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// Append a step (setup time only).
    pub fn add_step(&mut self, step: impl Into<FlowStep>) {
        self.steps.push(step.into());
    }

    /// Builder-style [`add_step`](Flow::add_step).
    pub fn with_step(mut self, step: impl Into<FlowStep>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Run the flow over a fresh context seeded with `initial`.
    ///
    /// A flow with zero steps returns the seeded context unchanged
    /// (identity behavior). Step failures propagate immediately and abort
    /// the run; retry policy belongs to the caller.
    pub async fn execute(
        &self,
        initial: crate::provider::Message,
        engine: &Engine,
        exec: &mut ExecutionContext,
    ) -> Result<FlowContext, EngineError> {
        let mut ctx = FlowContext::new(initial);
        for (index, step) in self.steps.iter().enumerate() {
            if exec.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            debug!(flow = %self.name, index, step = step.label(), "step started");
            run_step(step, &mut ctx, engine, exec).await?;
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_labels() {
        let step = FlowStep::agent("scout");
        assert_eq!(step.label(), "scout");
        assert_eq!(format!("{step:?}"), "Agent(scout)");
    }

    #[test]
    fn test_step_from_str() {
        let step: FlowStep = "scout".into();
        assert!(matches!(step, FlowStep::Agent(name) if name == "scout"));
    }

    #[test]
    fn test_flow_builder() {
        let flow = Flow::new("f").with_step("a").with_step("b");
        assert_eq!(flow.len(), 2);
        assert_eq!(flow.steps()[1].label(), "b");
    }

    #[test]
    fn test_empty_flow() {
        let flow = Flow::new("empty");
        assert!(flow.is_empty());
    }
}
