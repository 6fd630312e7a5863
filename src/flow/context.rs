//! Mutable state threaded through one flow execution.

use crate::provider::Message;
use serde_json::Value;
use std::collections::HashMap;

/// The state a flow run carries between steps.
///
/// One context exists per `run_flow` call. Parallel branches operate on
/// [`branch`](FlowContext::branch) copies and are merged back by the
/// pattern, so no locking is ever needed.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowContext {
    /// The most recent message produced by a step (or the initial input).
    pub current_message: Message,

    /// Append-only record of every message the flow has seen, starting
    /// with the initial input.
    pub history: Vec<Message>,

    /// String-keyed scratch space visible to every step of this run.
    pub shared_data: HashMap<String, Value>,
}

impl FlowContext {
    /// Seed a fresh context with the initial message.
    pub fn new(initial: Message) -> Self {
        Self {
            current_message: initial.clone(),
            history: vec![initial],
            shared_data: HashMap::new(),
        }
    }

    /// Record a step result: append to history and make it current.
    pub fn push(&mut self, message: Message) {
        self.history.push(message.clone());
        self.current_message = message;
    }

    /// Copy-on-branch for a parallel branch.
    ///
    /// The branch sees the same current message and history snapshot but
    /// gets its own `shared_data` map (cloned, so existing entries are
    /// readable); writes on either side stay private until the pattern's
    /// explicit merge step.
    pub fn branch(&self) -> Self {
        self.clone()
    }

    /// Read a shared-data entry.
    pub fn shared(&self, key: &str) -> Option<&Value> {
        self.shared_data.get(key)
    }

    /// Write a shared-data entry.
    pub fn set_shared(&mut self, key: impl Into<String>, value: Value) {
        self.shared_data.insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_seeds_history() {
        let ctx = FlowContext::new(Message::user("start"));
        assert_eq!(ctx.current_message.text(), "start");
        assert_eq!(ctx.history.len(), 1);
        assert_eq!(ctx.history[0].text(), "start");
    }

    #[test]
    fn test_push_appends_and_updates_current() {
        let mut ctx = FlowContext::new(Message::user("start"));
        ctx.push(Message::assistant("step one"));
        assert_eq!(ctx.current_message.text(), "step one");
        assert_eq!(ctx.history.len(), 2);
    }

    #[test]
    fn test_branch_shared_data_is_separate() {
        let mut ctx = FlowContext::new(Message::user("start"));
        ctx.set_shared("seen", json!(true));

        let mut branch = ctx.branch();
        // Existing entries are readable in the branch...
        assert_eq!(branch.shared("seen"), Some(&json!(true)));

        // ...but writes stay private on both sides.
        branch.set_shared("branch_only", json!(1));
        ctx.set_shared("parent_only", json!(2));
        assert!(ctx.shared("branch_only").is_none());
        assert!(branch.shared("parent_only").is_none());
    }

    #[test]
    fn test_branch_history_is_a_snapshot() {
        let ctx = FlowContext::new(Message::user("start"));
        let mut branch = ctx.branch();
        branch.push(Message::assistant("branch work"));
        assert_eq!(ctx.history.len(), 1);
        assert_eq!(branch.history.len(), 2);
    }
}
