//! Model binding abstraction.
//!
//! A model binding is the single consumed capability at the network
//! boundary: given a conversation and the tool definitions the agent may
//! use, it returns either final text or a structured tool-call request.
//! Retries, token accounting, and wire formats live behind this trait.

use crate::provider::error::ModelError;
use crate::provider::types::{GenerateConfig, Message, ModelResponse, StreamChunk};
use crate::tool::ToolDefinition;
use futures_util::Stream;
use std::pin::Pin;

/// Boxed stream of completion chunks.
pub type StreamingResponse = Pin<Box<dyn Stream<Item = Result<StreamChunk, ModelError>> + Send>>;

/// A language-model binding.
///
/// Implementations must distinguish a normal but empty response
/// (`ModelResponse::Content` with an empty string) from a failure
/// ([`ModelError`]).
///
/// # Example
///
/// ```
/// use aok::provider::{Message, ModelBinding, ModelResponse};
/// use aok::provider::mock::EchoModel;
///
/// # tokio_test::block_on(async {
/// let binding = EchoModel::default();
/// let response = binding
///     .complete(vec![Message::user("hi")], &[], &Default::default())
///     .await
///     .unwrap();
/// assert_eq!(response, ModelResponse::Content("processed:hi".to_string()));
/// # });
/// ```
#[async_trait::async_trait]
pub trait ModelBinding: Send + Sync {
    /// Run one completion over the given conversation.
    ///
    /// `tools` lists the definitions the model may request; an empty slice
    /// disables tool calling for this turn.
    async fn complete(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDefinition],
        config: &GenerateConfig,
    ) -> Result<ModelResponse, ModelError>;

    /// Streaming variant of [`complete`](ModelBinding::complete).
    ///
    /// The default implementation adapts the non-streaming call into a
    /// short chunk stream; bindings with native streaming should override.
    async fn complete_stream(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDefinition],
        config: &GenerateConfig,
    ) -> Result<StreamingResponse, ModelError> {
        let response = self.complete(messages, tools, config).await?;
        let chunks = match response {
            ModelResponse::Content(text) => {
                vec![Ok(StreamChunk::TextDelta(text)), Ok(StreamChunk::Done)]
            }
            ModelResponse::ToolCalls { content, calls } => {
                let mut chunks = Vec::with_capacity(3);
                if let Some(text) = content {
                    chunks.push(Ok(StreamChunk::TextDelta(text)));
                }
                chunks.push(Ok(StreamChunk::ToolCalls(calls)));
                chunks.push(Ok(StreamChunk::Done));
                chunks
            }
        };
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }

    /// Binding identifier for logging and error reporting.
    fn binding_name(&self) -> &str;
}
