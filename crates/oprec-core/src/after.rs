//! After processor: routing recorded data to strategy hooks

use crate::context::InvocationContext;
use crate::descriptor::OperationDescriptor;
use crate::error::RecordError;
use oprec_strategy::{Payload, Strategy, StrategyError, StrategyResolver};
use std::sync::Arc;

/// Routes old data, new data and the return value to the strategy
///
/// Dispatch order for a resolved strategy:
///
/// 1. argument-based variants with new data: `record_change` when prior
///    state was captured, `record` otherwise
/// 2. return-based variants with a return value: `record_return`
///
/// A missing descriptor or unresolvable strategy records nothing.
#[derive(Debug, Clone)]
pub struct AfterProcessor {
    resolver: Arc<dyn StrategyResolver>,
}

impl AfterProcessor {
    /// Create processor resolving strategies through `resolver`
    #[must_use]
    pub fn new(resolver: Arc<dyn StrategyResolver>) -> Self {
        Self { resolver }
    }

    /// Record the call
    ///
    /// # Errors
    /// Returns [`RecordError`] when a hook rejects the call or fails
    pub fn process(
        &self,
        ctx: &InvocationContext,
        descriptor: Option<&OperationDescriptor>,
        old_data: Option<&Payload>,
        new_data: Option<&Payload>,
    ) -> Result<(), RecordError> {
        let Some(descriptor) = descriptor else {
            return Ok(());
        };
        let Some(strategy) = self.resolver.resolve(descriptor.strategy()) else {
            tracing::debug!(
                strategy = %descriptor.strategy(),
                "strategy not resolved, recording disabled for {}::{}",
                ctx.class(),
                ctx.method()
            );
            return Ok(());
        };
        Self::record_with(&strategy, ctx, descriptor, old_data, new_data)
    }

    /// Record the call with an already resolved strategy
    ///
    /// # Errors
    /// Returns [`RecordError`] when a hook rejects the call or fails
    pub fn record_with(
        strategy: &Strategy,
        ctx: &InvocationContext,
        descriptor: &OperationDescriptor,
        old_data: Option<&Payload>,
        new_data: Option<&Payload>,
    ) -> Result<(), RecordError> {
        let site = ctx.call_site(descriptor);
        let capability = strategy.capability();
        let attribute = |source: StrategyError| RecordError {
            strategy: strategy.name().to_owned(),
            class: ctx.class().to_owned(),
            method: ctx.method().to_owned(),
            source,
        };

        if let Some(new_data) = new_data.filter(|_| capability.records_arguments()) {
            let recorded = match old_data {
                Some(old_data) => strategy.record_change(Some(&site), old_data, new_data),
                None => strategy.record(Some(&site), new_data),
            };
            recorded.map_err(attribute)?;
        }

        if let Some(returned) = ctx.returned().filter(|_| capability.records_return()) {
            strategy
                .record_return(Some(&site), returned)
                .map_err(attribute)?;
        }

        Ok(())
    }
}
