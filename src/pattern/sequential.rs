//! Pipeline composition: each step consumes the previous step's output.

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::flow::{run_step, FlowContext, FlowStep};
use crate::pattern::Pattern;
use async_trait::async_trait;
use tracing::debug;

/// Runs steps in order, feeding each step the previous step's output.
///
/// Fail-fast: the first failing step aborts the pattern and the error
/// propagates to the caller, who owns any retry policy.
///
/// # Example
///
/// ```
/// use aok::pattern::SequentialPattern;
///
/// let pipeline = SequentialPattern::new()
///     .with_step("draft")
///     .with_step("review");
/// ```
pub struct SequentialPattern {
    name: String,
    steps: Vec<FlowStep>,
}

impl SequentialPattern {
    /// Create an empty pipeline named `sequential`.
    pub fn new() -> Self {
        Self {
            name: "sequential".to_string(),
            steps: Vec::new(),
        }
    }

    /// Rename the pattern (affects logs and step labels).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: impl Into<FlowStep>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// The steps in execution order.
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }
}

impl Default for SequentialPattern {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pattern for SequentialPattern {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        ctx: &mut FlowContext,
        engine: &Engine,
        exec: &mut ExecutionContext,
    ) -> Result<(), EngineError> {
        for (index, step) in self.steps.iter().enumerate() {
            if exec.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            debug!(pattern = %self.name, index, step = step.label(), "sequential step");
            run_step(step, ctx, engine, exec).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let pattern = SequentialPattern::new()
            .with_name("pipeline")
            .with_step("a")
            .with_step("b");
        assert_eq!(pattern.name(), "pipeline");
        assert_eq!(pattern.steps().len(), 2);
        assert_eq!(pattern.steps()[0].label(), "a");
    }
}
