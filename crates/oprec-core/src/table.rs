//! Operation table: descriptors keyed by class and method

use crate::descriptor::OperationDescriptor;
use crate::error::{ConfigError, ConfigResult};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Descriptor lookup for interceptable methods
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationTable {
    operations: HashMap<String, HashMap<String, OperationDescriptor>>,
}

impl OperationTable {
    /// Create empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the descriptor of `class::method`
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateOperation`] if the method is already declared
    pub fn declare(
        &mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        descriptor: OperationDescriptor,
    ) -> ConfigResult<()> {
        let class = class.into();
        let methods = self.operations.entry(class.clone()).or_default();
        match methods.entry(method.into()) {
            Entry::Occupied(entry) => Err(ConfigError::DuplicateOperation {
                class,
                method: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Builder form of [`declare`](Self::declare)
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateOperation`] if the method is already declared
    pub fn with(
        mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        descriptor: OperationDescriptor,
    ) -> ConfigResult<Self> {
        self.declare(class, method, descriptor)?;
        Ok(self)
    }

    /// Descriptor of `class::method`
    #[must_use]
    pub fn get(&self, class: &str, method: &str) -> Option<&OperationDescriptor> {
        self.operations.get(class)?.get(method)
    }

    /// Number of declared methods
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.values().map(HashMap::len).sum()
    }

    /// Whether no method is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All `(class, method, descriptor)` entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &OperationDescriptor)> {
        self.operations.iter().flat_map(|(class, methods)| {
            methods
                .iter()
                .map(move |(method, descriptor)| (class.as_str(), method.as_str(), descriptor))
        })
    }
}
