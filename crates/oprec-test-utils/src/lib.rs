//! Testing utilities for oprec workspace
//!
//! Spy strategies that log every hook call, plus fixture data types.

#![allow(missing_docs)]

use oprec_strategy::{
    BasicStrategy, CallSite, Hook, ParamStrategy, Payload, QueryStrategy, ReturnStrategy,
    Strategy, StrategyError,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id: Some(id),
        name: name.to_string(),
    }
}

pub fn draft(name: &str) -> User {
    User {
        id: None,
        name: name.to_string(),
    }
}

/// Owned copy of a [`CallSite`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSnapshot {
    pub class: String,
    pub method: String,
    pub target: Option<String>,
    pub action: Option<String>,
}

impl From<&CallSite<'_>> for SiteSnapshot {
    fn from(site: &CallSite<'_>) -> Self {
        Self {
            class: site.class().to_string(),
            method: site.method().to_string(),
            target: site.target().map(str::to_string),
            action: site.action().map(str::to_string),
        }
    }
}

fn snapshot(site: Option<&CallSite<'_>>) -> Option<SiteSnapshot> {
    site.map(SiteSnapshot::from)
}

#[derive(Debug, Clone)]
pub enum HookCall {
    Capture {
        site: Option<SiteSnapshot>,
        new_data: Option<Payload>,
    },
    Record {
        site: Option<SiteSnapshot>,
        new_data: Payload,
    },
    RecordChange {
        site: Option<SiteSnapshot>,
        old_data: Payload,
        new_data: Payload,
    },
    RecordReturn {
        site: Option<SiteSnapshot>,
        returned: Payload,
    },
}

impl HookCall {
    pub fn hook(&self) -> Hook {
        match self {
            Self::Capture { .. } => Hook::Capture,
            Self::Record { .. } => Hook::Record,
            Self::RecordChange { .. } => Hook::RecordChange,
            Self::RecordReturn { .. } => Hook::RecordReturn,
        }
    }

    pub fn site(&self) -> Option<&SiteSnapshot> {
        match self {
            Self::Capture { site, .. }
            | Self::Record { site, .. }
            | Self::RecordChange { site, .. }
            | Self::RecordReturn { site, .. } => site.as_ref(),
        }
    }
}

/// Shared, thread-safe log of hook calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<HookCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: HookCall) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().clone()
    }

    pub fn hooks(&self) -> Vec<Hook> {
        self.calls.lock().iter().map(HookCall::hook).collect()
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.calls.lock().iter().filter(|c| c.hook() == hook).count()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

type QueryFn = dyn Fn(Option<&CallSite<'_>>, Option<&Payload>) -> Option<Payload> + Send + Sync;

/// NeedsQuery spy answering captures from a closure
pub struct QuerySpy {
    log: CallLog,
    query: Box<QueryFn>,
    accept_fresh: bool,
}

impl QuerySpy {
    pub fn new(
        log: CallLog,
        query: impl Fn(Option<&CallSite<'_>>, Option<&Payload>) -> Option<Payload>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            log,
            query: Box::new(query),
            accept_fresh: false,
        }
    }

    /// Spy whose query always returns `answer`
    pub fn answering(log: CallLog, answer: Option<Payload>) -> Self {
        Self::new(log, move |_, _| answer.clone())
    }

    /// Accept single-argument recording instead of rejecting it
    #[must_use]
    pub fn accepting_fresh_records(mut self) -> Self {
        self.accept_fresh = true;
        self
    }

    pub fn into_strategy(self) -> Strategy {
        Strategy::needs_query(self)
    }
}

impl fmt::Debug for QuerySpy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpy")
            .field("accept_fresh", &self.accept_fresh)
            .finish_non_exhaustive()
    }
}

impl QueryStrategy for QuerySpy {
    fn name(&self) -> &str {
        "query-spy"
    }

    fn capture(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError> {
        self.log.push(HookCall::Capture {
            site: snapshot(site),
            new_data: new_data.cloned(),
        });
        Ok((self.query)(site, new_data))
    }

    fn record(&self, site: Option<&CallSite<'_>>, new_data: &Payload) -> Result<(), StrategyError> {
        self.log.push(HookCall::Record {
            site: snapshot(site),
            new_data: new_data.clone(),
        });
        if self.accept_fresh {
            Ok(())
        } else {
            Err(StrategyError::unsupported(
                self.name(),
                oprec_strategy::Capability::NeedsQuery,
                Hook::Record,
            ))
        }
    }

    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        self.log.push(HookCall::RecordChange {
            site: snapshot(site),
            old_data: old_data.clone(),
            new_data: new_data.clone(),
        });
        Ok(())
    }
}

/// ParamOnly spy
#[derive(Debug, Clone, Default)]
pub struct ParamSpy {
    log: CallLog,
}

impl ParamSpy {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }

    pub fn into_strategy(self) -> Strategy {
        Strategy::param_only(self)
    }
}

impl ParamStrategy for ParamSpy {
    fn name(&self) -> &str {
        "param-spy"
    }

    fn record(&self, site: Option<&CallSite<'_>>, new_data: &Payload) -> Result<(), StrategyError> {
        self.log.push(HookCall::Record {
            site: snapshot(site),
            new_data: new_data.clone(),
        });
        Ok(())
    }

    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        self.log.push(HookCall::RecordChange {
            site: snapshot(site),
            old_data: old_data.clone(),
            new_data: new_data.clone(),
        });
        Ok(())
    }
}

/// ReturnOnly spy, optionally failing every record
#[derive(Debug, Clone, Default)]
pub struct ReturnSpy {
    log: CallLog,
    failure: Option<String>,
}

impl ReturnSpy {
    pub fn new(log: CallLog) -> Self {
        Self { log, failure: None }
    }

    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn into_strategy(self) -> Strategy {
        Strategy::return_only(self)
    }
}

impl ReturnStrategy for ReturnSpy {
    fn name(&self) -> &str {
        "return-spy"
    }

    fn record_return(
        &self,
        site: Option<&CallSite<'_>>,
        returned: &Payload,
    ) -> Result<(), StrategyError> {
        self.log.push(HookCall::RecordReturn {
            site: snapshot(site),
            returned: returned.clone(),
        });
        match &self.failure {
            Some(message) => Err(StrategyError::failed(self.name(), message.clone())),
            None => Ok(()),
        }
    }
}

/// Basic spy, optionally answering captures
#[derive(Debug, Clone, Default)]
pub struct BasicSpy {
    log: CallLog,
    answer: Option<Payload>,
}

impl BasicSpy {
    pub fn new(log: CallLog) -> Self {
        Self { log, answer: None }
    }

    #[must_use]
    pub fn answering(mut self, answer: Payload) -> Self {
        self.answer = Some(answer);
        self
    }

    pub fn into_strategy(self) -> Strategy {
        Strategy::basic(self)
    }
}

impl BasicStrategy for BasicSpy {
    fn name(&self) -> &str {
        "basic-spy"
    }

    fn capture(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError> {
        self.log.push(HookCall::Capture {
            site: snapshot(site),
            new_data: new_data.cloned(),
        });
        Ok(self.answer.clone())
    }

    fn record(&self, site: Option<&CallSite<'_>>, new_data: &Payload) -> Result<(), StrategyError> {
        self.log.push(HookCall::Record {
            site: snapshot(site),
            new_data: new_data.clone(),
        });
        Ok(())
    }

    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        self.log.push(HookCall::RecordChange {
            site: snapshot(site),
            old_data: old_data.clone(),
            new_data: new_data.clone(),
        });
        Ok(())
    }
}

/// Query spy whose capture always fails
#[derive(Debug, Clone, Default)]
pub struct BrokenQuerySpy {
    log: CallLog,
}

impl BrokenQuerySpy {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }

    pub fn into_strategy(self) -> Strategy {
        Strategy::needs_query(self)
    }
}

impl QueryStrategy for BrokenQuerySpy {
    fn name(&self) -> &str {
        "broken-query-spy"
    }

    fn capture(
        &self,
        site: Option<&CallSite<'_>>,
        new_data: Option<&Payload>,
    ) -> Result<Option<Payload>, StrategyError> {
        self.log.push(HookCall::Capture {
            site: snapshot(site),
            new_data: new_data.cloned(),
        });
        Err(StrategyError::failed(self.name(), "database unavailable"))
    }

    fn record_change(
        &self,
        site: Option<&CallSite<'_>>,
        old_data: &Payload,
        new_data: &Payload,
    ) -> Result<(), StrategyError> {
        self.log.push(HookCall::RecordChange {
            site: snapshot(site),
            old_data: old_data.clone(),
            new_data: new_data.clone(),
        });
        Ok(())
    }
}
