//! Message and response types shared across the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions injected ahead of the conversation.
    System,
    /// The caller (or the previous flow step).
    User,
    /// The model.
    Assistant,
    /// A tool result fed back to the model.
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        f.write_str(label)
    }
}

/// A tool invocation requested by the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back on the result message.
    pub id: String,

    /// Name of the requested tool.
    pub name: String,

    /// JSON arguments as produced by the model.
    pub arguments: Value,
}

impl ToolCallRequest {
    /// Create a tool-call request.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// One conversation message.
///
/// The same type flows everywhere: agent memory, model requests, tool
/// results, and flow history. Role-specific fields stay `None` where they
/// do not apply.
///
/// # Example
///
/// ```
/// use aok::provider::{Message, Role};
///
/// let message = Message::user("hello");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.text(), "hello");
/// assert!(!message.has_tool_calls());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: Role,

    /// Text content; `None` on assistant messages that only request
    /// tool calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by an assistant message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// On tool-role messages, the id of the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// On tool-role messages, the name of the tool that produced the
    /// result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    fn text_message(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text_message(Role::System, content)
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text_message(Role::User, content)
    }

    /// An assistant text message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text_message(Role::Assistant, content)
    }

    /// An assistant message carrying tool-call requests.
    pub fn assistant_with_tool_calls(
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
            tool_name: None,
        }
    }

    /// A tool-result message answering one tool call.
    pub fn tool(
        content: impl Into<String>,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            tool_name: Some(tool_name.into()),
        }
    }

    /// The text content, or the empty string when there is none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Whether this message requests any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// What a completion produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelResponse {
    /// Final text output.
    Content(String),

    /// The model wants tools executed before it can finish.
    ToolCalls {
        /// Text produced alongside the requests, if any.
        content: Option<String>,
        /// The requested calls, in order.
        calls: Vec<ToolCallRequest>,
    },
}

/// One element of a streaming completion.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamChunk {
    /// A piece of text output.
    TextDelta(String),

    /// Tool calls, delivered whole once known.
    ToolCalls(Vec<ToolCallRequest>),

    /// End of the stream.
    Done,
}

/// Generation parameters forwarded verbatim to the binding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Maximum output tokens; `None` leaves the binding's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature; `None` leaves the binding's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}
