//! Fan-out composition: every branch sees the same input.

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::flow::{run_step, FlowContext, FlowStep};
use crate::pattern::Pattern;
use crate::provider::Message;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Runs every branch concurrently against the same current message.
///
/// Each branch executes on its own context branch (snapshot history,
/// private shared data, fresh agent-instance cache), so branches never
/// observe each other. The pattern runs to completion even when branches
/// fail: after the barrier, per-branch outcomes are merged back in
/// declaration order under `parallel.{index}.{label}` shared-data keys,
/// and a JSON report of every branch (status, output or error) becomes
/// the new current message. A failed branch therefore never fails the
/// pattern; callers inspect the report.
pub struct ParallelPattern {
    name: String,
    branches: Vec<FlowStep>,
}

impl ParallelPattern {
    /// Create an empty fan-out named `parallel`.
    pub fn new() -> Self {
        Self {
            name: "parallel".to_string(),
            branches: Vec::new(),
        }
    }

    /// Rename the pattern.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a branch.
    pub fn with_branch(mut self, step: impl Into<FlowStep>) -> Self {
        self.branches.push(step.into());
        self
    }

    /// The branches in declaration order.
    pub fn branches(&self) -> &[FlowStep] {
        &self.branches
    }
}

impl Default for ParallelPattern {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pattern for ParallelPattern {
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

        debug!(pattern = %self.name, branches = self.branches.len(), "fan-out");
        let futures = self.branches.iter().map(|step| {
            let step = step.clone();
            let mut branch_ctx = ctx.branch();
            let mut branch_exec = exec.branch();
            async move {
                let result = run_step(&step, &mut branch_ctx, engine, &mut branch_exec).await;
                (step, branch_ctx, result)
            }
        });
        let outcomes = join_all(futures).await;

        // Cancellation during the fan-out surfaces here rather than as a
        // per-branch error.
        if exec.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let mut report = Vec::with_capacity(outcomes.len());
        for (index, (step, branch_ctx, result)) in outcomes.into_iter().enumerate() {
            let label = step.label();
            match result {
                Ok(()) => {
                    let output = branch_ctx.current_message.text().to_string();
                    ctx.shared_data.insert(
                        format!("{}.{index}.{label}", self.name),
                        json!(output),
                    );
                    report.push(json!({
                        "branch": label,
                        "index": index,
                        "status": "ok",
                        "output": output,
                    }));
                }
                Err(error) => {
                    warn!(pattern = %self.name, branch = label, index, %error, "branch failed");
                    report.push(json!({
                        "branch": label,
                        "index": index,
                        "status": "error",
                        "error": error.to_string(),
                    }));
                }
            }
        }

        ctx.push(Message::assistant(Value::Array(report).to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let pattern = ParallelPattern::new()
            .with_name("fanout")
            .with_branch("a")
            .with_branch("b");
        assert_eq!(pattern.name(), "fanout");
        assert_eq!(pattern.branches().len(), 2);
    }
}
