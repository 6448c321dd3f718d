//! Recorder facade: descriptor lookup plus dispatch

use crate::config::RecorderConfig;
use crate::context::{InvocationContext, ReturnValue};
use crate::dispatcher::{Dispatched, Dispatcher};
use crate::error::ConfigResult;
use crate::table::OperationTable;
use oprec_strategy::StrategyResolver;
use std::future::Future;
use std::sync::Arc;

/// Entry point for interception layers
///
/// Looks up the descriptor of the intercepted method in its
/// [`OperationTable`] and runs the call through a [`Dispatcher`]. Methods
/// absent from the table pass straight through.
///
/// # Example
///
/// ```rust,ignore
/// let registry = Arc::new(StrategyRegistry::with_defaults());
/// registry.register("user-audit", Strategy::needs_query(UserAudit::new(db)))?;
///
/// let config = RecorderConfig::load("oprec.toml")?;
/// let recorder = Recorder::from_config(&config, registry)?;
///
/// let ctx = InvocationContext::new("UserService", "update").with_arg(patch.clone());
/// let saved = recorder.invoke(ctx, || service.update(patch))?;
/// ```
#[derive(Debug, Clone)]
pub struct Recorder {
    table: Arc<OperationTable>,
    dispatcher: Dispatcher,
}

impl Recorder {
    /// Create recorder over a table
    #[must_use]
    pub fn new(table: OperationTable, resolver: Arc<dyn StrategyResolver>) -> Self {
        tracing::debug!(operations = table.len(), "recorder created");
        Self {
            table: Arc::new(table),
            dispatcher: Dispatcher::new(resolver),
        }
    }

    /// Create recorder from configuration
    ///
    /// Only the operation table is read. The `telemetry` section is left to
    /// the host, which passes it to [`telemetry::initialise`](crate::telemetry::initialise).
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateOperation`](crate::ConfigError::DuplicateOperation)
    /// if a method is listed twice
    pub fn from_config(
        config: &RecorderConfig,
        resolver: Arc<dyn StrategyResolver>,
    ) -> ConfigResult<Self> {
        Ok(Self::new(config.operation_table()?, resolver))
    }

    /// Operation table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// Underlying dispatcher
    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run an intercepted call
    ///
    /// # Errors
    /// Returns the business error unchanged
    pub fn invoke<T, E, F>(&self, ctx: InvocationContext, call: F) -> Result<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Result<T, E>,
    {
        let descriptor = self.table.get(ctx.class(), ctx.method());
        self.dispatcher.dispatch(ctx, descriptor, call)
    }

    /// Run an intercepted call, keeping the recording outcome
    pub fn invoke_traced<T, E, F>(&self, ctx: InvocationContext, call: F) -> Dispatched<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Result<T, E>,
    {
        let descriptor = self.table.get(ctx.class(), ctx.method());
        self.dispatcher.dispatch_traced(ctx, descriptor, call)
    }

    /// Run an intercepted async call
    ///
    /// # Errors
    /// Returns the business error unchanged
    pub async fn invoke_async<T, E, F, Fut>(&self, ctx: InvocationContext, call: F) -> Result<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let descriptor = self.table.get(ctx.class(), ctx.method());
        self.dispatcher.dispatch_async(ctx, descriptor, call).await
    }
}
