//! Mock model bindings for tests and offline development.
//!
//! Neither mock touches the network. [`ScriptedModel`] replays a queue of
//! prepared replies and records every request it receives; [`EchoModel`]
//! deterministically echoes the latest message content.

use crate::provider::error::ModelError;
use crate::provider::traits::ModelBinding;
use crate::provider::types::{GenerateConfig, Message, ModelResponse};
use crate::tool::ToolDefinition;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A binding that replays scripted replies in order.
///
/// When the script runs out it returns an empty `Content` response, which
/// is a normal (non-error) completion. Every request's message list is
/// recorded for later assertions.
///
/// # Example
///
/// ```
/// use aok::provider::mock::ScriptedModel;
/// use aok::provider::{Message, ModelBinding, ModelResponse};
///
/// # tokio_test::block_on(async {
/// let model = ScriptedModel::from_responses(vec![
///     ModelResponse::Content("first".to_string()),
/// ]);
/// let reply = model
///     .complete(vec![Message::user("go")], &[], &Default::default())
///     .await
///     .unwrap();
/// assert_eq!(reply, ModelResponse::Content("first".to_string()));
/// assert_eq!(model.request_count(), 1);
/// # });
/// ```
pub struct ScriptedModel {
    name: String,
    replies: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    /// Create an empty script under the default name `scripted`.
    pub fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a script from a list of successful responses.
    pub fn from_responses(responses: Vec<ModelResponse>) -> Self {
        let model = Self::new();
        {
            let mut replies = model.replies.lock().expect("scripted model state poisoned");
            replies.extend(responses.into_iter().map(Ok));
        }
        model
    }

    /// Rename the binding (affects logging and error attribution).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a successful response to the script.
    pub fn push_response(&self, response: ModelResponse) {
        self.replies
            .lock()
            .expect("scripted model state poisoned")
            .push_back(Ok(response));
    }

    /// Append a failure to the script.
    pub fn push_failure(&self, error: ModelError) {
        self.replies
            .lock()
            .expect("scripted model state poisoned")
            .push_back(Err(error));
    }

    /// Number of completion requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("scripted model state poisoned")
            .len()
    }

    /// Snapshot of every request's message list, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .expect("scripted model state poisoned")
            .clone()
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModelBinding for ScriptedModel {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _tools: &[ToolDefinition],
        _config: &GenerateConfig,
    ) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .expect("scripted model state poisoned")
            .push(messages);
        let next = self
            .replies
            .lock()
            .expect("scripted model state poisoned")
            .pop_front();
        match next {
            Some(reply) => reply,
            None => Ok(ModelResponse::Content(String::new())),
        }
    }

    fn binding_name(&self) -> &str {
        &self.name
    }
}

/// A binding that echoes the latest message content behind a prefix.
///
/// Useful for asserting exactly which input reached an agent: with the
/// default prefix, input `M` produces `processed:M`.
pub struct EchoModel {
    prefix: String,
    calls: AtomicUsize,
}

impl EchoModel {
    /// Create an echo binding with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for EchoModel {
    fn default() -> Self {
        Self::new("processed:")
    }
}

#[async_trait::async_trait]
impl ModelBinding for EchoModel {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _tools: &[ToolDefinition],
        _config: &GenerateConfig,
    ) -> Result<ModelResponse, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latest = messages
            .iter()
            .rev()
            .find_map(|message| message.content.clone())
            .unwrap_or_default();
        Ok(ModelResponse::Content(format!("{}{}", self.prefix, latest)))
    }

    fn binding_name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::ToolCallRequest;
    use futures_util::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_replay_order() {
        let model = ScriptedModel::from_responses(vec![
            ModelResponse::Content("a".to_string()),
            ModelResponse::Content("b".to_string()),
        ]);

        let first = model
            .complete(vec![Message::user("1")], &[], &Default::default())
            .await
            .unwrap();
        let second = model
            .complete(vec![Message::user("2")], &[], &Default::default())
            .await
            .unwrap();

        assert_eq!(first, ModelResponse::Content("a".to_string()));
        assert_eq!(second, ModelResponse::Content("b".to_string()));
        assert_eq!(model.request_count(), 2);
        assert_eq!(model.requests()[1][0].text(), "2");
    }

    #[tokio::test]
    async fn test_scripted_exhausted_returns_empty_content() {
        let model = ScriptedModel::new();
        let reply = model
            .complete(vec![Message::user("x")], &[], &Default::default())
            .await
            .unwrap();
        assert_eq!(reply, ModelResponse::Content(String::new()));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let model = ScriptedModel::new();
        model.push_failure(ModelError::network("scripted", "down"));
        let result = model
            .complete(vec![Message::user("x")], &[], &Default::default())
            .await;
        assert!(matches!(result, Err(ModelError::Network { .. })));
    }

    #[tokio::test]
    async fn test_echo_uses_latest_content() {
        let model = EchoModel::default();
        let reply = model
            .complete(
                vec![Message::system("sys"), Message::user("hello")],
                &[],
                &Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(reply, ModelResponse::Content("processed:hello".to_string()));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_default_stream_adapts_tool_calls() {
        let call = ToolCallRequest::new("c1", "search", json!({}));
        let model = ScriptedModel::from_responses(vec![ModelResponse::ToolCalls {
            content: Some("looking".to_string()),
            calls: vec![call.clone()],
        }]);

        let stream = model
            .complete_stream(vec![Message::user("go")], &[], &Default::default())
            .await
            .unwrap();
        let chunks: Vec<_> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(
            chunks,
            vec![
                crate::provider::StreamChunk::TextDelta("looking".to_string()),
                crate::provider::StreamChunk::ToolCalls(vec![call]),
                crate::provider::StreamChunk::Done,
            ]
        );
    }
}
