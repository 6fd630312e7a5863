//! Agent configuration and live instances.

pub mod config;
pub mod instance;

pub use config::{AgentConfig, DEFAULT_MAX_TOOL_ITERATIONS};
pub use instance::AgentInstance;
