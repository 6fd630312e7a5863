//! Model binding abstraction and the message types shared across the crate.
//!
//! The orchestration core treats the language model as an opaque
//! capability: "given a conversation and tool definitions, return text or
//! tool-call requests". Concrete HTTP clients implement [`ModelBinding`];
//! the [`mock`] module ships network-free implementations for tests.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::ModelError;
pub use traits::{ModelBinding, StreamingResponse};
pub use types::{GenerateConfig, Message, ModelResponse, Role, StreamChunk, ToolCallRequest};
