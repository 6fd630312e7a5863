//! Composition patterns: reusable multi-agent topologies.
//!
//! A pattern operates on a running [`FlowContext`] and drives one or more
//! agents (or nested patterns) through the engine. Patterns nest freely:
//! any pattern is a valid [`FlowStep`](crate::flow::FlowStep), so a
//! parallel branch can contain a sequential pipeline that contains a
//! router, and so on.

mod discussion;
mod parallel;
mod router;
mod sequential;

pub use discussion::DiscussionPattern;
pub use parallel::ParallelPattern;
pub use router::RouterPattern;
pub use sequential::SequentialPattern;

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::flow::FlowContext;
use async_trait::async_trait;

/// A composition of agents executable as a single flow step.
///
/// Implementations mutate the context in place: push resulting messages,
/// record merge data under namespaced `shared_data` keys, and leave
/// `current_message` at whatever the next step should consume.
#[async_trait]
pub trait Pattern: Send + Sync {
    /// Label used in logs, step labels, and shared-data key namespaces.
    fn name(&self) -> &str;

    /// Run the pattern against the flow state.
    async fn execute(
        &self,
        ctx: &mut FlowContext,
        engine: &Engine,
        exec: &mut ExecutionContext,
    ) -> Result<(), EngineError>;
}
