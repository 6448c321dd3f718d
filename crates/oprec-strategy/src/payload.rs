//! Opaque payload carrier
//!
//! Provides [`Payload`], the type-erased value handed between the recording
//! pipeline and strategies. The pipeline never looks inside a payload; only
//! strategies downcast it back to a concrete type.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased value
///
/// Cloning a payload shares the underlying value, so the same object can be
/// handed to a strategy as both "old" and "new" data. Identity is observable
/// through [`Payload::ptr_eq`].
#[derive(Clone)]
pub struct Payload {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Payload {
    /// Wrap an owned value
    #[inline]
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Wrap an already shared value without copying it
    #[inline]
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    /// Full type name of the wrapped value
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type id of the wrapped value
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        Any::type_id(&*self.value)
    }

    /// Check whether the wrapped value is a `T`
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the wrapped value as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Get a shared handle to the wrapped value as `T`
    #[must_use]
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Check whether both payloads share the same underlying value
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Order {
        id: u32,
    }

    #[test]
    fn payload_downcast() {
        let payload = Payload::new(Order { id: 3 });
        assert!(payload.is::<Order>());
        assert!(!payload.is::<String>());
        assert_eq!(payload.downcast_ref::<Order>(), Some(&Order { id: 3 }));
        assert_eq!(payload.type_id(), TypeId::of::<Order>());
    }

    #[test]
    fn payload_type_name() {
        let payload = Payload::new(7_i64);
        assert_eq!(payload.type_name(), "i64");
    }

    #[test]
    fn payload_clone_shares_value() {
        let payload = Payload::new(Order { id: 1 });
        let copy = payload.clone();
        assert!(payload.ptr_eq(&copy));

        let other = Payload::new(Order { id: 1 });
        assert!(!payload.ptr_eq(&other));
    }

    #[test]
    fn payload_from_arc_keeps_identity() {
        let shared = Arc::new(Order { id: 9 });
        let payload = Payload::from_arc(Arc::clone(&shared));
        let back = payload.downcast_arc::<Order>().unwrap();
        assert!(Arc::ptr_eq(&shared, &back));
        assert!(payload.downcast_arc::<String>().is_none());
    }

    #[test]
    fn payload_debug_hides_value() {
        let payload = Payload::new(String::from("secret"));
        let rendered = format!("{payload:?}");
        assert!(rendered.contains("String"));
        assert!(!rendered.contains("secret"));
    }
}
