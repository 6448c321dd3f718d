//! Strategy registry for recording strategies
//!
//! Provides [`StrategyRegistry`], an explicit mapping from [`StrategyId`] to a
//! shared [`Strategy`] instance, and the [`StrategyResolver`] seam the
//! pipeline resolves strategies through.

use crate::error::RegistryError;
use crate::strategy::{NoopStrategy, Strategy};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a registered strategy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(Cow<'static, str>);

impl StrategyId {
    /// Identifier of the no-op strategy used when a descriptor names none
    pub const DEFAULT: Self = Self(Cow::Borrowed("default"));

    /// Create identifier from a name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Create identifier from a strategy type
    #[inline]
    #[must_use]
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<S>()))
    }

    /// Identifier as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for StrategyId {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for StrategyId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Resolves a strategy identifier to a shared instance
///
/// `None` means recording is disabled for the call, never a failure.
pub trait StrategyResolver: Send + Sync + fmt::Debug {
    /// Look up a strategy
    fn resolve(&self, id: &StrategyId) -> Option<Strategy>;
}

/// Registry of recording strategies
///
/// Populated at startup and shared behind an `Arc`. Registration goes
/// through `&self`, so late registrations are visible to dispatchers that
/// already hold the registry.
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: DashMap<StrategyId, Strategy>,
}

impl StrategyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: DashMap::new(),
        }
    }

    /// Create registry holding the no-op strategy under [`StrategyId::DEFAULT`]
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry
            .strategies
            .insert(StrategyId::DEFAULT, Strategy::basic(NoopStrategy));
        registry
    }

    /// Register a strategy
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the identifier is taken
    pub fn register(
        &self,
        id: impl Into<StrategyId>,
        strategy: Strategy,
    ) -> Result<(), RegistryError> {
        match self.strategies.entry(id.into()) {
            Entry::Occupied(entry) => Err(RegistryError::Duplicate {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(
                    strategy = %entry.key(),
                    capability = %strategy.capability(),
                    "registered recording strategy"
                );
                entry.insert(strategy);
                Ok(())
            }
        }
    }

    /// Register a strategy under the identifier of its type
    ///
    /// # Errors
    /// Returns [`RegistryError::Duplicate`] if the type is already registered
    pub fn register_type<S: 'static>(&self, strategy: Strategy) -> Result<(), RegistryError> {
        self.register(StrategyId::of::<S>(), strategy)
    }

    /// Insert or replace a strategy, returning the previous one
    pub fn replace(&self, id: impl Into<StrategyId>, strategy: Strategy) -> Option<Strategy> {
        self.strategies.insert(id.into(), strategy)
    }

    /// Check if strategy exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &StrategyId) -> bool {
        self.strategies.contains_key(id)
    }

    /// Remove strategy
    #[inline]
    pub fn remove(&self, id: &StrategyId) -> Option<Strategy> {
        self.strategies.remove(id).map(|(_, strategy)| strategy)
    }

    /// Look up a strategy
    #[inline]
    #[must_use]
    pub fn get(&self, id: &StrategyId) -> Option<Strategy> {
        self.strategies.get(id).map(|entry| entry.value().clone())
    }

    /// List all registered identifiers, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<StrategyId> {
        let mut ids: Vec<StrategyId> = self
            .strategies
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl StrategyResolver for StrategyRegistry {
    fn resolve(&self, id: &StrategyId) -> Option<Strategy> {
        self.get(id)
    }
}
