//! Conditional dispatch: a router agent picks the branch.

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::flow::{run_step, FlowContext, FlowStep};
use crate::pattern::Pattern;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

/// Asks a router agent for a label, then runs the matching route.
///
/// The router agent sees the current message and is expected to answer
/// with exactly one route label; its reply is trimmed and matched
/// case-sensitively against the route table. The selected route then runs
/// against the original current message, not the router's reply, so the
/// router stays invisible to downstream steps. The chosen label is
/// recorded under the `router.{name}` shared-data key.
///
/// An unmatched label falls back to the default route, or fails with
/// [`EngineError::Routing`] when none is configured.
pub struct RouterPattern {
    name: String,
    router_agent: String,
    routes: HashMap<String, FlowStep>,
    default_route: Option<FlowStep>,
}

impl RouterPattern {
    /// Create a router dispatching through the named agent.
    pub fn new(router_agent: impl Into<String>) -> Self {
        Self {
            name: "router".to_string(),
            router_agent: router_agent.into(),
            routes: HashMap::new(),
            default_route: None,
        }
    }

    /// Rename the pattern (also changes the shared-data key).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Map a label to a route.
    pub fn with_route(mut self, label: impl Into<String>, step: impl Into<FlowStep>) -> Self {
        self.routes.insert(label.into(), step.into());
        self
    }

    /// Route taken when the router's label matches nothing.
    pub fn with_default_route(mut self, step: impl Into<FlowStep>) -> Self {
        self.default_route = Some(step.into());
        self
    }

    /// The router agent's name.
    pub fn router_agent(&self) -> &str {
        &self.router_agent
    }
}

#[async_trait]
impl Pattern for RouterPattern {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        ctx: &mut FlowContext,
        engine: &Engine,
        exec: &mut ExecutionContext,
    ) -> Result<(), EngineError> {
        if exec.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let input = ctx.current_message.clone();
        let reply = engine
            .call_agent_in(exec, &self.router_agent, input, None)
            .await?;
        let label = reply.text().trim().to_string();
        debug!(pattern = %self.name, router = %self.router_agent, %label, "route selected");

        let step = match self.routes.get(&label) {
            Some(step) => step,
            None => self
                .default_route
                .as_ref()
                .ok_or_else(|| EngineError::routing(&self.router_agent, &label))?,
        };

        ctx.set_shared(format!("router.{}", self.name), json!(label));
        run_step(step, ctx, engine, exec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let pattern = RouterPattern::new("triage")
            .with_name("support")
            .with_route("billing", "billing_agent")
            .with_default_route("general_agent");
        assert_eq!(pattern.name(), "support");
        assert_eq!(pattern.router_agent(), "triage");
        assert!(pattern.routes.contains_key("billing"));
        assert!(pattern.default_route.is_some());
    }
}
