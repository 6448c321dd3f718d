//! Error types for recording and configuration

use oprec_strategy::{Hook, StrategyError};
use std::path::PathBuf;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Recording failure for one intercepted call
///
/// Never alters the business result; surfaced by
/// [`Dispatcher::dispatch_traced`](crate::Dispatcher::dispatch_traced).
#[derive(Debug, thiserror::Error)]
#[error("recording {class}::{method} with strategy '{strategy}' failed")]
pub struct RecordError {
    /// Strategy name
    pub strategy: String,
    /// Declaring class name
    pub class: String,
    /// Method name
    pub method: String,
    /// Hook error
    #[source]
    pub source: StrategyError,
}

impl RecordError {
    /// Check if the strategy rejected a hook outside its capability
    #[inline]
    #[must_use]
    pub fn is_capability_mismatch(&self) -> bool {
        self.source.is_unsupported()
    }

    /// Hook rejected by a capability mismatch
    #[inline]
    #[must_use]
    pub fn rejected_hook(&self) -> Option<Hook> {
        self.source.rejected_hook()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML document
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid YAML document
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension not recognised
    #[error("unsupported config format for {}: expected .toml, .yaml or .yml", path.display())]
    UnsupportedFormat {
        /// File path
        path: PathBuf,
    },

    /// Same method declared twice
    #[error("operation {class}::{method} declared more than once")]
    DuplicateOperation {
        /// Declaring class name
        class: String,
        /// Method name
        method: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use oprec_strategy::Capability;
    use std::error::Error as _;

    #[test]
    fn record_error_mismatch() {
        let err = RecordError {
            strategy: "audit".into(),
            class: "UserService".into(),
            method: "create".into(),
            source: StrategyError::unsupported("audit", Capability::NeedsQuery, Hook::Record),
        };

        assert!(err.is_capability_mismatch());
        assert_eq!(err.rejected_hook(), Some(Hook::Record));
        assert_eq!(
            err.to_string(),
            "recording UserService::create with strategy 'audit' failed"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn record_error_sink_failure() {
        let err = RecordError {
            strategy: "audit".into(),
            class: "UserService".into(),
            method: "find".into(),
            source: StrategyError::failed("audit", "disk full"),
        };
        assert!(!err.is_capability_mismatch());
        assert!(err.rejected_hook().is_none());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::DuplicateOperation {
            class: "UserService".into(),
            method: "update".into(),
        };
        assert_eq!(
            err.to_string(),
            "operation UserService::update declared more than once"
        );

        let err = ConfigError::UnsupportedFormat {
            path: PathBuf::from("oprec.json"),
        };
        assert!(err.to_string().contains("oprec.json"));
    }
}
