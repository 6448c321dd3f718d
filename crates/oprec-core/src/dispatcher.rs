//! Interception pipeline
//!
//! Every intercepted call runs `ENTER → (CAPTURE)? → INVOKE → RECORD → EXIT`:
//!
//! - `ENTER`: extract the argument named by the descriptor and resolve the
//!   strategy once for the whole call
//! - `CAPTURE`: capture prior state when the classifier asks for it, always
//!   before the business call
//! - `INVOKE`: run the business call; on failure its error is returned
//!   unchanged and nothing is recorded
//! - `RECORD`: hand old data, new data and the return value to the strategy
//! - `EXIT`: return the business result unchanged
//!
//! Recording failures never alter the business result. [`Dispatcher::dispatch`]
//! logs and discards them; [`Dispatcher::dispatch_traced`] hands them back.

use crate::after::AfterProcessor;
use crate::before::BeforeProcessor;
use crate::classifier::CapabilityClassifier;
use crate::context::{InvocationContext, ReturnValue};
use crate::descriptor::OperationDescriptor;
use crate::error::RecordError;
use crate::extractor::ArgumentExtractor;
use oprec_strategy::{Payload, Strategy, StrategyResolver};
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

/// Business outcome of a dispatched call plus its recording outcome
#[derive(Debug)]
#[must_use]
pub struct Dispatched<T, E> {
    outcome: Result<T, E>,
    recording: Result<(), RecordError>,
}

impl<T, E> Dispatched<T, E> {
    /// Business outcome
    #[inline]
    pub fn outcome(&self) -> &Result<T, E> {
        &self.outcome
    }

    /// Recording failure, if any
    #[inline]
    #[must_use]
    pub fn recording_error(&self) -> Option<&RecordError> {
        self.recording.as_ref().err()
    }

    /// Whether the call was recorded without error
    #[inline]
    #[must_use]
    pub fn recorded_cleanly(&self) -> bool {
        self.recording.is_ok()
    }

    /// Drop the recording outcome
    ///
    /// # Errors
    /// Returns the business error unchanged
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        self.outcome
    }

    /// Split into business and recording outcomes
    #[inline]
    pub fn into_parts(self) -> (Result<T, E>, Result<(), RecordError>) {
        (self.outcome, self.recording)
    }
}

/// Per-call state carried from `ENTER` to `RECORD`
struct Prepared {
    strategy: Option<Strategy>,
    old_data: Option<Payload>,
    new_data: Option<Payload>,
}

/// Runs intercepted calls through capture and recording
///
/// Holds no per-call state; one dispatcher can be shared across threads
/// and tasks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: Arc<dyn StrategyResolver>,
}

impl Dispatcher {
    /// Create dispatcher resolving strategies through `resolver`
    #[must_use]
    pub fn new(resolver: Arc<dyn StrategyResolver>) -> Self {
        Self { resolver }
    }

    /// Strategy resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn StrategyResolver> {
        &self.resolver
    }

    /// Run `call` and record it according to `descriptor`
    ///
    /// A missing descriptor passes straight through.
    ///
    /// # Errors
    /// Returns the business error unchanged
    pub fn dispatch<T, E, F>(
        &self,
        ctx: InvocationContext,
        descriptor: Option<&OperationDescriptor>,
        call: F,
    ) -> Result<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Result<T, E>,
    {
        self.dispatch_traced(ctx, descriptor, call).into_result()
    }

    /// Run `call`, returning the recording outcome alongside the business one
    pub fn dispatch_traced<T, E, F>(
        &self,
        mut ctx: InvocationContext,
        descriptor: Option<&OperationDescriptor>,
        call: F,
    ) -> Dispatched<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Result<T, E>,
    {
        let Some(descriptor) = descriptor else {
            return Dispatched {
                outcome: call(),
                recording: Ok(()),
            };
        };

        let span = tracing::debug_span!("dispatch", class = %ctx.class(), method = %ctx.method());
        let _guard = span.enter();

        let prepared = self.prepare(&ctx, descriptor);
        let outcome = call();
        let recording = Self::complete(&mut ctx, descriptor, prepared, &outcome);
        Dispatched { outcome, recording }
    }

    /// Async form of [`dispatch`](Self::dispatch)
    ///
    /// Strategy hooks still run synchronously on the calling task.
    ///
    /// # Errors
    /// Returns the business error unchanged
    pub async fn dispatch_async<T, E, F, Fut>(
        &self,
        ctx: InvocationContext,
        descriptor: Option<&OperationDescriptor>,
        call: F,
    ) -> Result<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.dispatch_async_traced(ctx, descriptor, call)
            .await
            .into_result()
    }

    /// Async form of [`dispatch_traced`](Self::dispatch_traced)
    pub async fn dispatch_async_traced<T, E, F, Fut>(
        &self,
        mut ctx: InvocationContext,
        descriptor: Option<&OperationDescriptor>,
        call: F,
    ) -> Dispatched<T, E>
    where
        T: ReturnValue,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(descriptor) = descriptor else {
            return Dispatched {
                outcome: call().await,
                recording: Ok(()),
            };
        };

        let span = tracing::debug_span!("dispatch", class = %ctx.class(), method = %ctx.method());
        async move {
            let prepared = self.prepare(&ctx, descriptor);
            let outcome = call().await;
            let recording = Self::complete(&mut ctx, descriptor, prepared, &outcome);
            Dispatched { outcome, recording }
        }
        .instrument(span)
        .await
    }

    /// `ENTER` and `CAPTURE`
    fn prepare(&self, ctx: &InvocationContext, descriptor: &OperationDescriptor) -> Prepared {
        let strategy = self.resolver.resolve(descriptor.strategy());
        let new_data = ArgumentExtractor::extract(ctx.args(), descriptor.args()).cloned();
        let reason =
            CapabilityClassifier::classify(descriptor, strategy.as_ref().map(Strategy::capability));

        let old_data = match (&strategy, reason) {
            (Some(strategy), Some(reason)) => {
                tracing::debug!(
                    strategy = strategy.name(),
                    %reason,
                    argument = new_data.is_some(),
                    "capturing prior state"
                );
                BeforeProcessor::capture_with(strategy, ctx, descriptor, new_data.as_ref())
            }
            (None, _) => {
                tracing::debug!(
                    strategy = %descriptor.strategy(),
                    "strategy not resolved, recording disabled"
                );
                None
            }
            (Some(_), None) => None,
        };

        Prepared {
            strategy,
            old_data,
            new_data,
        }
    }

    /// `RECORD`, skipped when the business call failed
    fn complete<T: ReturnValue, E>(
        ctx: &mut InvocationContext,
        descriptor: &OperationDescriptor,
        prepared: Prepared,
        outcome: &Result<T, E>,
    ) -> Result<(), RecordError> {
        let Ok(value) = outcome else {
            tracing::debug!("business call failed, skipping record");
            return Ok(());
        };
        let Some(strategy) = prepared.strategy else {
            return Ok(());
        };

        ctx.set_returned(value.to_payload());
        let recorded = AfterProcessor::record_with(
            &strategy,
            ctx,
            descriptor,
            prepared.old_data.as_ref(),
            prepared.new_data.as_ref(),
        );

        if let Err(e) = &recorded {
            tracing::error!(
                strategy = %e.strategy,
                capability_mismatch = e.is_capability_mismatch(),
                error = %e.source,
                "recording failed: {e}"
            );
        }
        recorded
    }
}
