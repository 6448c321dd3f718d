//! oprec Core - Operation recording pipeline
//!
//! Intercepts business calls and routes their data to a recording strategy:
//! - Extracts the argument an operation is about
//! - Captures prior state before the call when the operation asks for it
//! - Runs the business call and leaves its result untouched
//! - Hands old data, new data and the return value to the strategy
//!
//! # Example
//!
//! ```rust,ignore
//! use oprec_core::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StrategyRegistry::with_defaults());
//! registry.register("user-audit", Strategy::needs_query(UserAudit::new(db)))?;
//!
//! let table = OperationTable::new().with(
//!     "UserService",
//!     "update",
//!     OperationDescriptor::new("user-audit").with_comparable(true),
//! )?;
//! let recorder = Recorder::new(table, registry);
//!
//! let ctx = InvocationContext::new("UserService", "update").with_arg(patch.clone());
//! let saved = recorder.invoke(ctx, || service.update(patch))?;
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod after;
pub mod before;
pub mod classifier;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod recorder;
pub mod table;
pub mod telemetry;

// Re-exports for convenience
pub use after::AfterProcessor;
pub use before::BeforeProcessor;
pub use classifier::{CapabilityClassifier, CaptureReason};
pub use config::{LogFormat, OperationEntry, RecorderConfig, TelemetryConfig};
pub use context::{InvocationContext, ReturnValue};
pub use descriptor::{ArgType, OperationDescriptor};
pub use dispatcher::{Dispatched, Dispatcher};
pub use error::{ConfigError, ConfigResult, RecordError};
pub use extractor::ArgumentExtractor;
pub use recorder::Recorder;
pub use table::OperationTable;
pub use telemetry::{TelemetryError, TelemetryHandle};

pub use oprec_strategy::{
    BasicStrategy, CallSite, Capability, Hook, NoopStrategy, OperationRecord, ParamStrategy,
    Payload, QueryStrategy, RegistryError, ReturnStrategy, Strategy, StrategyError, StrategyId,
    StrategyRegistry, StrategyResolver,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring the recording pipeline
    pub use crate::{
        ArgType, BasicStrategy, CallSite, Dispatcher, InvocationContext, OperationDescriptor,
        OperationTable, ParamStrategy, Payload, QueryStrategy, Recorder, RecorderConfig,
        ReturnStrategy, ReturnValue, Strategy, StrategyError, StrategyId, StrategyRegistry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
