//! Operation descriptors
//!
//! An [`OperationDescriptor`] is the immutable configuration attached to one
//! interceptable method. It is built once at startup, either in code with the
//! `with_*` builders or from configuration through
//! [`OperationEntry`](crate::config::OperationEntry).

use oprec_strategy::{Payload, StrategyId};
use std::any::{Any, TypeId};
use std::fmt;

/// Declared type of the argument to extract
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArgType {
    /// First non-null argument
    #[default]
    Any,

    /// Argument of exactly this Rust type
    Exact {
        /// Type id to match
        id: TypeId,
        /// Type name (for diagnostics)
        name: &'static str,
    },

    /// Argument whose type name matches (declared from configuration)
    ///
    /// A path-qualified name must equal the argument's full type name; a
    /// bare name matches the last path segment, ignoring generics.
    Named(String),
}

impl ArgType {
    /// Argument type from a Rust type
    #[inline]
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self::Exact {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Argument type from a type name; `any` and `*` mean [`ArgType::Any`]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case("any") {
            Self::Any
        } else if trimmed.len() == name.len() {
            Self::Named(name)
        } else {
            Self::Named(trimmed.to_owned())
        }
    }

    /// Check whether an argument matches this type
    #[must_use]
    pub fn matches(&self, arg: &Payload) -> bool {
        match self {
            Self::Any => true,
            Self::Exact { id, .. } => arg.type_id() == *id,
            Self::Named(name) => type_names_match(name, arg.type_name()),
        }
    }

    /// Declared type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "any",
            Self::Exact { name, .. } => name,
            Self::Named(name) => name.as_str(),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn type_names_match(declared: &str, actual: &str) -> bool {
    if declared == actual {
        return true;
    }
    if declared.contains("::") {
        return false;
    }
    let base = actual.split('<').next().unwrap_or(actual);
    base.rsplit("::").next() == Some(declared)
}

/// Immutable recording configuration of one interceptable method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationDescriptor {
    strategy: StrategyId,
    args: ArgType,
    comparable: bool,
    removed: bool,
    target: Option<String>,
    action: Option<String>,
}

impl OperationDescriptor {
    /// Create descriptor resolving to `strategy`, extracting any argument
    #[inline]
    #[must_use]
    pub fn new(strategy: impl Into<StrategyId>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    /// With argument type
    #[inline]
    #[must_use]
    pub fn with_args(mut self, args: ArgType) -> Self {
        self.args = args;
        self
    }

    /// With argument type taken from a Rust type
    #[inline]
    #[must_use]
    pub fn with_arg_type<T: Any>(self) -> Self {
        self.with_args(ArgType::of::<T>())
    }

    /// Request old/new comparison
    #[inline]
    #[must_use]
    pub fn with_comparable(mut self, comparable: bool) -> Self {
        self.comparable = comparable;
        self
    }

    /// Mark as deletion
    #[inline]
    #[must_use]
    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    /// With target label
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// With action label
    #[inline]
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Strategy identifier
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &StrategyId {
        &self.strategy
    }

    /// Declared argument type
    #[inline]
    #[must_use]
    pub fn args(&self) -> &ArgType {
        &self.args
    }

    /// Whether old/new comparison is requested
    #[inline]
    #[must_use]
    pub fn comparable(&self) -> bool {
        self.comparable
    }

    /// Whether the operation is a deletion
    #[inline]
    #[must_use]
    pub fn removed(&self) -> bool {
        self.removed
    }

    /// Target label
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Action label
    #[inline]
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod billing {
        #[derive(Debug)]
        pub struct Invoice;

        #[derive(Debug)]
        pub struct Batch<T>(pub Vec<T>);
    }

    #[test]
    fn descriptor_defaults() {
        let d = OperationDescriptor::default();
        assert_eq!(d.strategy(), &StrategyId::DEFAULT);
        assert_eq!(d.args(), &ArgType::Any);
        assert!(!d.comparable());
        assert!(!d.removed());
        assert!(d.target().is_none());
        assert!(d.action().is_none());
    }

    #[test]
    fn descriptor_builder() {
        let d = OperationDescriptor::new("user-audit")
            .with_arg_type::<billing::Invoice>()
            .with_comparable(true)
            .with_removed(true)
            .with_target("INVOICE")
            .with_action("DELETE");

        assert_eq!(d.strategy().as_str(), "user-audit");
        assert_eq!(d.args(), &ArgType::of::<billing::Invoice>());
        assert!(d.comparable());
        assert!(d.removed());
        assert_eq!(d.target(), Some("INVOICE"));
        assert_eq!(d.action(), Some("DELETE"));
    }

    #[test]
    fn arg_type_exact_match() {
        let arg = Payload::new(billing::Invoice);
        assert!(ArgType::of::<billing::Invoice>().matches(&arg));
        assert!(!ArgType::of::<String>().matches(&arg));
        assert!(ArgType::Any.matches(&arg));
    }

    #[test]
    fn arg_type_named_match() {
        let arg = Payload::new(billing::Invoice);
        assert!(ArgType::named("Invoice").matches(&arg));
        assert!(ArgType::named(std::any::type_name::<billing::Invoice>()).matches(&arg));
        assert!(!ArgType::named("other::Invoice").matches(&arg));
        assert!(!ArgType::named("Voice").matches(&arg));
    }

    #[test]
    fn arg_type_named_ignores_generics() {
        let arg = Payload::new(billing::Batch(vec![1_u8]));
        assert!(ArgType::named("Batch").matches(&arg));
    }

    #[test]
    fn arg_type_named_any_aliases() {
        assert_eq!(ArgType::named("any"), ArgType::Any);
        assert_eq!(ArgType::named("ANY"), ArgType::Any);
        assert_eq!(ArgType::named("*"), ArgType::Any);
        assert_eq!(ArgType::named(" "), ArgType::Any);
        assert_eq!(ArgType::named(" User "), ArgType::Named("User".into()));
    }

    #[test]
    fn arg_type_display() {
        assert_eq!(ArgType::Any.to_string(), "any");
        assert_eq!(ArgType::of::<u32>().to_string(), "u32");
        assert_eq!(ArgType::named("User").to_string(), "User");
    }
}
