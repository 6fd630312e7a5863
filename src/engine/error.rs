//! Error taxonomy for engine and pattern execution.

use crate::provider::ModelError;
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors surfaced by [`Engine`](crate::engine::Engine) calls and pattern
/// execution.
///
/// Configuration errors (see [`is_configuration`](EngineError::is_configuration))
/// are deterministic and caller-fixable; model errors may be transient
/// and are propagated unmasked so the caller owns the retry policy.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A registry lookup or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The underlying model binding failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// No model binding was resolvable at any precedence level.
    #[error("no model binding resolvable for agent: {agent}")]
    NoModelBinding {
        /// Agent whose instantiation failed.
        agent: String,
    },

    /// An override or config named a binding that is not registered.
    #[error("unknown model binding: {name}")]
    UnknownModelBinding {
        /// The unregistered binding name.
        name: String,
    },

    /// An override or config named a memory factory that is not
    /// registered.
    #[error("unknown memory factory: {name}")]
    UnknownMemoryFactory {
        /// The unregistered factory name.
        name: String,
    },

    /// A router agent produced a label with no matching route and no
    /// default route was configured.
    #[error("router {router} produced unroutable label: {label:?}")]
    Routing {
        /// The router agent's name.
        router: String,
        /// The label that matched nothing.
        label: String,
    },

    /// The caller's cancellation token fired before completion.
    #[error("execution cancelled")]
    Cancelled,
}

impl EngineError {
    /// Create a NoModelBinding error.
    pub fn no_model_binding(agent: impl Into<String>) -> Self {
        Self::NoModelBinding {
            agent: agent.into(),
        }
    }

    /// Create a Routing error.
    pub fn routing(router: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Routing {
            router: router.into(),
            label: label.into(),
        }
    }

    /// Whether this is a deterministic configuration error (fix the
    /// setup) as opposed to a possibly-transient execution error (decide
    /// whether to retry).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Registry(_)
                | Self::NoModelBinding { .. }
                | Self::UnknownModelBinding { .. }
                | Self::UnknownMemoryFactory { .. }
                | Self::Routing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CapabilityKind, RegistryError};

    #[test]
    fn test_configuration_classification() {
        assert!(EngineError::no_model_binding("a").is_configuration());
        assert!(EngineError::routing("r", "x").is_configuration());
        assert!(
            EngineError::from(RegistryError::not_found(CapabilityKind::Agent, "a"))
                .is_configuration()
        );
        assert!(!EngineError::from(ModelError::network("m", "down")).is_configuration());
        assert!(!EngineError::Cancelled.is_configuration());
    }

    #[test]
    fn test_messages() {
        let error = EngineError::no_model_binding("scout");
        assert!(error.to_string().contains("scout"));

        let error = EngineError::routing("triage", "weird");
        assert!(error.to_string().contains("triage"));
        assert!(error.to_string().contains("weird"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
