//! Recording strategy traits and the capability-tagged [`Strategy`] handle
//!
//! Strategy authors implement exactly one of [`BasicStrategy`],
//! [`QueryStrategy`], [`ParamStrategy`] or [`ReturnStrategy`] and wrap the
//! instance in the matching [`Strategy`] variant. The pipeline only ever talks
//! to the [`Strategy`] handle, which routes each hook to the implementation or
//! rejects it with [`StrategyError::UnsupportedOperation`] when the declared
//! capability does not cover it.
//!
//! Strategy instances are shared by every call that resolves to them and
//! must not keep per-call state between hooks. Everything a hook needs
//! arrives through its parameters.

use crate::capability::{Capability, Hook};
use crate::error::StrategyError;
use crate::payload::Payload;
use std::fmt;
use std::sync::Arc;

/// Identity of the intercepted call, passed to hooks as context
///
/// `target` and `action` are free-form labels taken from the operation's
/// descriptor (for example `USER` / `UPDATE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    class: &'a str,
    method: &'a str,
    target: Option<&'a str>,
    action: Option<&'a str>,
}

impl<'a> CallSite<'a> {
    /// Create call site without labels
    #[inline]
    #[must_use]
    pub const fn new(class: &'a str, method: &'a str) -> Self {
        Self {
            class,
            method,
            target: None,
            action: None,
        }
    }

    /// Set target label
    #[inline]
    #[must_use]
    pub const fn with_target(mut self, target: Option<&'a str>) -> Self {
        self.target = target;
        self
    }

    /// Set action label
    #[inline]
    #[must_use]
    pub const fn with_action(mut self, action: Option<&'a str>) -> Self {
        self.action = action;
        self
    }

    /// Declaring class (or type) name
    #[inline]
    #[must_use]
    pub const fn class(&self) -> &'a str {
        self.class
    }

    /// Method name
    #[inline]
    #[must_use]
    pub const fn method(&self) -> &'a str {
        self.method
    }

    /// Target label
    #[inline]
    #[must_use]
    pub const fn target(&self) -> Option<&'a str> {
        self.target
    }

    /// Action label
    #[inline]
    #[must_use]
    pub const fn action(&self) -> Option<&'a str> {
        self.action
    }
}

impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// Strategy with arbitrary old/new data and no return-value support
///
/// Every hook defaults to a no-op.
pub trait BasicStrategy: Send + Sync + fmt::Debug {
    /// Strategy name (for diagnostics)
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Capture prior state
    ///
    /// `new_data` is `None` when no argument matched the declared type.
    fn capture(
        &self,
        _site: Option<&CallSite<'_>>,
        _new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError> {
        Ok(None)
    }

    /// Record new data when no prior state exists
    fn record(&self, _site: Option<&CallSite<'_>>, _new_data: &Payload) -> Result<(), StrategyError> {
        Ok(())
    }

    /// Record old and new data
    fn record_change(
        &self,
        _site: Option<&CallSite<'_>>,
        _old_data: &Payload,
        _new_data: &Payload,
    ) -> Result<(), StrategyError> {
        Ok(())
    }
}

/// Strategy that queries prior state before the call executes
pub trait QueryStrategy: Send + Sync + fmt::Debug {
    /// Strategy name (for diagnostics)
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Query prior state keyed by the extracted argument
    ///
    /// Called with the call site first; when that yields `None` it is called
    /// again without context. `new_data` is `None` when no argument matched
    /// the declared type, in which case the query can only go by the call
    /// site.
    fn capture(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError>;

    /// Record new data when the query found nothing
    ///
    /// Rejected unless overridden: a query strategy must opt in to recording
    /// without a "before" value.
    fn record(&self, _site: Option<&CallSite<'_>>, _new_data: &Payload) -> Result<(), StrategyError> {
        Err(StrategyError::unsupported(
            self.name(),
            Capability::NeedsQuery,
            Hook::Record,
        ))
    }

    /// Record queried prior state against new data
    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError>;
}

/// Strategy whose "before" value is the extracted argument itself
///
/// Capture is not overridable: the pipeline always hands the argument back
/// as old data, so [`ParamStrategy::record_change`] receives the same object
/// twice.
pub trait ParamStrategy: Send + Sync + fmt::Debug {
    /// Strategy name (for diagnostics)
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Record new data when no prior state exists
    ///
    /// Never reached through the pipeline: whenever an argument is extracted
    /// it is also captured as old data, so [`ParamStrategy::record_change`]
    /// runs instead. Only direct calls on the [`Strategy`] handle land here.
    fn record(&self, _site: Option<&CallSite<'_>>, _new_data: &Payload) -> Result<(), StrategyError> {
        Ok(())
    }

    /// Record the argument as both old and new data
    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError>;
}

/// Strategy that records only the call's return value
pub trait ReturnStrategy: Send + Sync + fmt::Debug {
    /// Strategy name (for diagnostics)
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Record the return value
    fn record_return(
        &self,
        site: Option<&CallSite<'_>>,
        returned: &Payload,
    ) -> Result<(), StrategyError>;
}

/// Shared strategy instance tagged with its capability
#[derive(Debug, Clone)]
pub enum Strategy {
    /// [`Capability::Basic`]
    Basic(Arc<dyn BasicStrategy>),

    /// [`Capability::NeedsQuery`]
    NeedsQuery(Arc<dyn QueryStrategy>),

    /// [`Capability::ParamOnly`]
    ParamOnly(Arc<dyn ParamStrategy>),

    /// [`Capability::ReturnOnly`]
    ReturnOnly(Arc<dyn ReturnStrategy>),
}

impl Strategy {
    /// Wrap a basic strategy
    #[inline]
    #[must_use]
    pub fn basic(strategy: impl BasicStrategy + 'static) -> Self {
        Self::Basic(Arc::new(strategy))
    }

    /// Wrap a query strategy
    #[inline]
    #[must_use]
    pub fn needs_query(strategy: impl QueryStrategy + 'static) -> Self {
        Self::NeedsQuery(Arc::new(strategy))
    }

    /// Wrap a param-only strategy
    #[inline]
    #[must_use]
    pub fn param_only(strategy: impl ParamStrategy + 'static) -> Self {
        Self::ParamOnly(Arc::new(strategy))
    }

    /// Wrap a return-only strategy
    #[inline]
    #[must_use]
    pub fn return_only(strategy: impl ReturnStrategy + 'static) -> Self {
        Self::ReturnOnly(Arc::new(strategy))
    }

    /// Declared capability
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Capability {
        match self {
            Self::Basic(_) => Capability::Basic,
            Self::NeedsQuery(_) => Capability::NeedsQuery,
            Self::ParamOnly(_) => Capability::ParamOnly,
            Self::ReturnOnly(_) => Capability::ReturnOnly,
        }
    }

    /// Strategy name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(s) => s.name(),
            Self::NeedsQuery(s) => s.name(),
            Self::ParamOnly(s) => s.name(),
            Self::ReturnOnly(s) => s.name(),
        }
    }

    fn unsupported(&self, hook: Hook) -> StrategyError {
        StrategyError::unsupported(self.name(), self.capability(), hook)
    }

    /// Capture prior state
    ///
    /// Param-only strategies hand `new_data` back unchanged.
    ///
    /// # Errors
    /// - `UnsupportedOperation` for return-only strategies
    /// - any error raised by the strategy itself
    pub fn capture(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError> {
        match self {
            Self::Basic(s) => s.capture(site, new_data),
            Self::NeedsQuery(s) => s.capture(site, new_data),
            Self::ParamOnly(_) => Ok(new_data.cloned()),
            Self::ReturnOnly(_) => Err(self.unsupported(Hook::Capture)),
        }
    }

    /// Record new data without prior state
    ///
    /// # Errors
    /// - `UnsupportedOperation` for return-only strategies, or when the
    ///   strategy declines the hook
    /// - any error raised by the strategy itself
    pub fn record(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        match self {
            Self::Basic(s) => s.record(site, new_data),
            Self::NeedsQuery(s) => s.record(site, new_data),
            Self::ParamOnly(s) => s.record(site, new_data),
            Self::ReturnOnly(_) => Err(self.unsupported(Hook::Record)),
        }
    }

    /// Record old and new data
    ///
    /// # Errors
    /// - `UnsupportedOperation` for return-only strategies
    /// - any error raised by the strategy itself
    pub fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        match self {
            Self::Basic(s) => s.record_change(site, old_data, new_data),
            Self::NeedsQuery(s) => s.record_change(site, old_data, new_data),
            Self::ParamOnly(s) => s.record_change(site, old_data, new_data),
            Self::ReturnOnly(_) => Err(self.unsupported(Hook::RecordChange)),
        }
    }

    /// Record the return value
    ///
    /// # Errors
    /// - `UnsupportedOperation` unless the strategy is return-only
    /// - any error raised by the strategy itself
    pub fn record_return(
        &self,
        site: Option<&CallSite<'_>>,
        returned: &Payload,
    ) -> Result<(), StrategyError> {
        match self {
            Self::ReturnOnly(s) => s.record_return(site, returned),
            _ => Err(self.unsupported(Hook::RecordReturn)),
        }
    }
}

/// Strategy that records nothing
///
/// Registered under [`StrategyId::DEFAULT`](crate::StrategyId::DEFAULT) by
/// [`StrategyRegistry::with_defaults`](crate::StrategyRegistry::with_defaults).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStrategy;

impl BasicStrategy for NoopStrategy {
    fn name(&self) -> &str {
        "noop"
    }
}
