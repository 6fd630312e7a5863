//! Round-table composition: participants take turns over a shared
//! transcript.

use crate::engine::{Engine, EngineError, ExecutionContext};
use crate::flow::FlowContext;
use crate::pattern::Pattern;
use crate::provider::Message;
use async_trait::async_trait;
use std::fmt::Write as _;
use tracing::debug;

/// Runs a fixed number of discussion rounds over a growing transcript.
///
/// Each round visits every participant in declaration order; each
/// participant sees the full transcript so far (topic plus every prior
/// contribution) and its reply is appended to both the transcript and the
/// flow history. The round count is fixed up front; there is no
/// convergence check or early exit. An optional moderator receives the
/// final transcript and produces a summary, which becomes the pattern's
/// output; without one, the last participant's reply stands.
pub struct DiscussionPattern {
    name: String,
    participants: Vec<String>,
    moderator: Option<String>,
    rounds: u32,
}

impl DiscussionPattern {
    /// Create a discussion over the given participants. `rounds` is
    /// clamped to at least one.
    pub fn new(participants: Vec<String>, rounds: u32) -> Self {
        Self {
            name: "discussion".to_string(),
            participants,
            moderator: None,
            rounds: rounds.max(1),
        }
    }

    /// Rename the pattern.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Have the named agent summarize the finished discussion.
    pub fn with_moderator(mut self, agent: impl Into<String>) -> Self {
        self.moderator = Some(agent.into());
        self
    }

    /// The participants in turn order.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Number of rounds.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

#[async_trait]
impl Pattern for DiscussionPattern {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        ctx: &mut FlowContext,
        engine: &Engine,
        exec: &mut ExecutionContext,
    ) -> Result<(), EngineError> {
        let mut transcript = format!("Topic: {}", ctx.current_message.text());

        for round in 1..=self.rounds {
            for participant in &self.participants {
                if exec.is_cancelled() {
                    return Err(EngineError::Cancelled);
                }
                debug!(pattern = %self.name, round, participant = %participant, "turn");
                let reply = engine
                    .call_agent_in(exec, participant, Message::user(transcript.clone()), None)
                    .await?;
                let _ = write!(
                    transcript,
                    "\n[round {round}] {participant}: {}",
                    reply.text()
                );
                ctx.push(reply);
            }
        }

        if let Some(moderator) = &self.moderator {
            if exec.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            let prompt = format!("{transcript}\n\nSummarize the discussion above.");
            let summary = engine
                .call_agent_in(exec, moderator, Message::user(prompt), None)
                .await?;
            ctx.push(summary);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_clamped_to_one() {
        let pattern = DiscussionPattern::new(vec!["a".to_string()], 0);
        assert_eq!(pattern.rounds(), 1);
    }

    #[test]
    fn test_builder() {
        let pattern =
            DiscussionPattern::new(vec!["optimist".to_string(), "skeptic".to_string()], 2)
                .with_name("debate")
                .with_moderator("judge");
        assert_eq!(pattern.name(), "debate");
        assert_eq!(pattern.participants().len(), 2);
        assert_eq!(pattern.moderator.as_deref(), Some("judge"));
    }
}
