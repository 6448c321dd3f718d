//! Before processor: prior-state capture

use crate::context::InvocationContext;
use crate::descriptor::OperationDescriptor;
use oprec_strategy::{Capability, Payload, Strategy, StrategyResolver};
use std::sync::Arc;

/// Captures prior state before the business call runs
///
/// Capture is best-effort: an unresolvable strategy, a return-only strategy
/// or a failing hook all yield `None` and never stop the call.
#[derive(Debug, Clone)]
pub struct BeforeProcessor {
    resolver: Arc<dyn StrategyResolver>,
}

impl BeforeProcessor {
    /// Create processor resolving strategies through `resolver`
    #[must_use]
    pub fn new(resolver: Arc<dyn StrategyResolver>) -> Self {
        Self { resolver }
    }

    /// Capture prior state for `new_data`, which is `None` when no argument
    /// matched the declared type
    #[must_use]
    pub fn process(
        &self,
        ctx: &InvocationContext,
        descriptor: &OperationDescriptor,
        new_data: Option<&Payload>,
    ) -> Option<Payload> {
        let strategy = self.resolver.resolve(descriptor.strategy())?;
        Self::capture_with(&strategy, ctx, descriptor, new_data)
    }

    /// Capture prior state with an already resolved strategy
    #[must_use]
    pub fn capture_with(
        strategy: &Strategy,
        ctx: &InvocationContext,
        descriptor: &OperationDescriptor,
        new_data: Option<&Payload>,
    ) -> Option<Payload> {
        if strategy.capability() == Capability::ReturnOnly {
            return None;
        }

        let site = ctx.call_site(descriptor);
        let captured = strategy
            .capture(Some(&site), new_data)
            .and_then(|old| match old {
                Some(old) => Ok(Some(old)),
                None => strategy.capture(None, new_data),
            });

        match captured {
            Ok(old) => {
                tracing::debug!(
                    strategy = strategy.name(),
                    captured = old.is_some(),
                    "captured prior state for {site}"
                );
                old
            }
            Err(e) => {
                tracing::warn!(
                    strategy = strategy.name(),
                    error = %e,
                    "capture failed for {site}, continuing without prior state"
                );
                None
            }
        }
    }
}
