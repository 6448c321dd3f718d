//! Recorder configuration
//!
//! A [`RecorderConfig`] carries the telemetry settings and the declarative
//! list of intercepted operations. It loads from TOML or YAML:
//!
//! ```toml
//! [telemetry]
//! log_filter = "oprec_core=debug"
//! log_format = "compact"
//!
//! [[operations]]
//! class = "UserService"
//! method = "update"
//! strategy = "user-audit"
//! args = "User"
//! comparable = true
//! target = "USER"
//! action = "UPDATE"
//! ```

use crate::descriptor::{ArgType, OperationDescriptor};
use crate::error::{ConfigError, ConfigResult};
use crate::table::OperationTable;
use oprec_strategy::StrategyId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported log output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Structured JSON
    #[default]
    Json,
    /// Human-readable single line
    Compact,
}

impl LogFormat {
    /// Stable snake_case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Telemetry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive string
    pub log_filter: String,
    /// Output format
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

/// One intercepted method as declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationEntry {
    /// Declaring class (or type) name
    pub class: String,
    /// Method name
    pub method: String,
    /// Strategy identifier
    #[serde(default)]
    pub strategy: StrategyId,
    /// Argument type name, `any` for the first non-null argument
    #[serde(default = "default_args")]
    pub args: String,
    /// Request old/new comparison
    #[serde(default)]
    pub comparable: bool,
    /// Mark as deletion
    #[serde(default)]
    pub removed: bool,
    /// Target label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Action label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

fn default_args() -> String {
    "any".to_string()
}

impl OperationEntry {
    /// Descriptor for this entry
    #[must_use]
    pub fn descriptor(&self) -> OperationDescriptor {
        let mut descriptor = OperationDescriptor::new(self.strategy.clone())
            .with_args(ArgType::named(self.args.as_str()))
            .with_comparable(self.comparable)
            .with_removed(self.removed);
        if let Some(target) = &self.target {
            descriptor = descriptor.with_target(target.as_str());
        }
        if let Some(action) = &self.action {
            descriptor = descriptor.with_action(action.as_str());
        }
        descriptor
    }
}

/// Top-level recorder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecorderConfig {
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
    /// Intercepted operations
    pub operations: Vec<OperationEntry>,
}

impl RecorderConfig {
    /// Parse from a TOML document
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for invalid documents
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse from a YAML document
    ///
    /// # Errors
    /// Returns [`ConfigError::Yaml`] for invalid documents
    pub fn from_yaml_str(source: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read, has an unknown
    /// extension or fails to parse
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&source)?;
        tracing::debug!(
            path = %path.display(),
            operations = config.operations.len(),
            "loaded recorder config"
        );
        Ok(config)
    }

    /// Build the operation table
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateOperation`] if a method is listed twice
    pub fn operation_table(&self) -> ConfigResult<OperationTable> {
        let mut table = OperationTable::new();
        for entry in &self.operations {
            table.declare(entry.class.as_str(), entry.method.as_str(), entry.descriptor())?;
        }
        Ok(table)
    }
}
