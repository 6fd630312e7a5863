//! Model binding failures.

use thiserror::Error;

/// A failure reported by a model binding.
///
/// Every variant names the binding it came from, so a multi-model run can
/// attribute failures. The engine propagates these unmasked; retry policy
/// belongs to the caller, guided by [`is_transient`](ModelError::is_transient).
#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider could not be reached.
    #[error("model binding {binding}: network failure: {message}")]
    Network {
        /// Binding that failed.
        binding: String,
        /// Provider or transport detail.
        message: String,
    },

    /// Credentials were rejected.
    #[error("model binding {binding}: authentication failed: {message}")]
    Auth {
        /// Binding that failed.
        binding: String,
        /// Provider detail.
        message: String,
    },

    /// The provider throttled the request.
    #[error("model binding {binding}: rate limited: {message}")]
    RateLimited {
        /// Binding that failed.
        binding: String,
        /// Provider detail.
        message: String,
    },

    /// Any other provider-side failure.
    #[error("model binding {binding}: provider error: {message}")]
    Provider {
        /// Binding that failed.
        binding: String,
        /// Provider detail.
        message: String,
    },
}

impl ModelError {
    /// Create a Network error.
    pub fn network(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            binding: binding.into(),
            message: message.into(),
        }
    }

    /// Create an Auth error.
    pub fn auth(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            binding: binding.into(),
            message: message.into(),
        }
    }

    /// Create a RateLimited error.
    pub fn rate_limited(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimited {
            binding: binding.into(),
            message: message.into(),
        }
    }

    /// Create a Provider error.
    pub fn provider(binding: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            binding: binding.into(),
            message: message.into(),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ModelError::network("b", "down").is_transient());
        assert!(ModelError::rate_limited("b", "slow down").is_transient());
        assert!(!ModelError::auth("b", "bad key").is_transient());
        assert!(!ModelError::provider("b", "500").is_transient());
    }

    #[test]
    fn test_messages_name_the_binding() {
        let error = ModelError::auth("openai", "invalid key");
        assert!(error.to_string().contains("openai"));
        assert!(error.to_string().contains("invalid key"));
    }
}
