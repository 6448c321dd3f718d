//! Error types for strategies and the strategy registry

use crate::capability::{Capability, Hook};
use crate::registry::StrategyId;

/// Boxed error raised by a strategy's own sink
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised from a strategy hook
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// Hook invoked outside the strategy's declared capability
    #[error("strategy '{strategy}' ({capability}) does not support {hook}")]
    UnsupportedOperation {
        /// Strategy name
        strategy: String,
        /// Declared capability
        capability: Capability,
        /// Rejected hook
        hook: Hook,
    },

    /// The strategy's own work failed
    #[error("strategy '{strategy}' failed: {message}")]
    Failed {
        /// Strategy name
        strategy: String,
        /// Human-readable description
        message: String,
        /// Underlying sink error
        #[source]
        source: Option<BoxError>,
    },
}

impl StrategyError {
    /// Create capability mismatch error
    #[inline]
    #[must_use]
    pub fn unsupported(strategy: impl Into<String>, capability: Capability, hook: Hook) -> Self {
        Self::UnsupportedOperation {
            strategy: strategy.into(),
            capability,
            hook,
        }
    }

    /// Create failure without an underlying cause
    #[inline]
    #[must_use]
    pub fn failed(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            strategy: strategy.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create failure wrapping a sink error
    #[inline]
    #[must_use]
    pub fn failed_with(
        strategy: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Failed {
            strategy: strategy.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Check if this is a capability mismatch
    #[inline]
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Hook rejected by a capability mismatch
    #[inline]
    #[must_use]
    pub fn rejected_hook(&self) -> Option<Hook> {
        match self {
            Self::UnsupportedOperation { hook, .. } => Some(*hook),
            Self::Failed { .. } => None,
        }
    }
}

/// Strategy registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Identifier already taken
    #[error("strategy '{id}' is already registered")]
    Duplicate {
        /// Conflicting identifier
        id: StrategyId,
    },
}
