//! Capability registry: named tools, agents, and flows.
//!
//! The registry replaces any ambient singleton: it is an explicit value,
//! populated at startup and passed (behind an `Arc`) into the
//! [`Engine`](crate::engine::Engine).

pub mod error;
#[allow(clippy::module_inception)]
pub mod registry;

pub use error::{CapabilityKind, RegistryError};
pub use registry::CapabilityRegistry;
