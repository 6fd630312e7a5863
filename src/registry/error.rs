//! Error types for the capability registry.

use thiserror::Error;

/// The kind of capability a registry entry describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// A tool specification.
    Tool,
    /// An agent configuration.
    Agent,
    /// A flow definition.
    Flow,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Tool => write!(f, "tool"),
            CapabilityKind::Agent => write!(f, "agent"),
            CapabilityKind::Flow => write!(f, "flow"),
        }
    }
}

/// Errors raised by registry operations.
///
/// Both variants are deterministic configuration errors: the caller must
/// fix the registration or the lookup name, never retry.
///
/// # Example
///
/// ```
/// use aok::registry::{CapabilityKind, RegistryError};
///
/// let error = RegistryError::not_found(CapabilityKind::Agent, "unknown");
/// assert!(error.to_string().contains("unknown"));
/// ```
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No entry with the given name exists.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Kind of capability looked up.
        kind: CapabilityKind,
        /// Name that was not found.
        name: String,
    },

    /// An entry with the given name is already registered.
    #[error("{kind} already registered: {name}")]
    DuplicateName {
        /// Kind of capability registered.
        kind: CapabilityKind,
        /// The duplicate name.
        name: String,
    },
}

impl RegistryError {
    /// Create a NotFound error.
    pub fn not_found(kind: CapabilityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a DuplicateName error.
    pub fn duplicate_name(kind: CapabilityKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = RegistryError::not_found(CapabilityKind::Tool, "missing");
        assert!(error.to_string().contains("tool"));
        assert!(error.to_string().contains("missing"));
        assert!(error.to_string().contains("not found"));
    }

    #[test]
    fn test_duplicate_message() {
        let error = RegistryError::duplicate_name(CapabilityKind::Flow, "pipeline");
        assert!(error.to_string().contains("flow"));
        assert!(error.to_string().contains("already registered"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(CapabilityKind::Agent.to_string(), "agent");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RegistryError>();
    }
}
