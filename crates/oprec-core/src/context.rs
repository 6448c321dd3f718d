//! Per-call invocation context and return-value conversion

use crate::descriptor::OperationDescriptor;
use oprec_strategy::{CallSite, Payload};
use std::any::Any;
use std::sync::Arc;

/// Ephemeral state of one intercepted call
///
/// Created by the interception layer at call entry and moved into the
/// dispatcher, which owns it until the call exits. The return value is
/// filled in after the business call succeeds.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    class: String,
    method: String,
    args: Vec<Option<Payload>>,
    returned: Option<Payload>,
}

impl InvocationContext {
    /// Create context with no arguments
    #[inline]
    #[must_use]
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            args: Vec::new(),
            returned: None,
        }
    }

    /// Append an argument
    #[inline]
    #[must_use]
    pub fn with_arg<T: Any + Send + Sync>(mut self, arg: T) -> Self {
        self.args.push(Some(Payload::new(arg)));
        self
    }

    /// Append an already erased argument, `None` for null
    #[inline]
    #[must_use]
    pub fn with_payload(mut self, arg: Option<Payload>) -> Self {
        self.args.push(arg);
        self
    }

    /// Append a null argument
    #[inline]
    #[must_use]
    pub fn with_null_arg(self) -> Self {
        self.with_payload(None)
    }

    /// Declaring class (or type) name
    #[inline]
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Ordered argument list
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Option<Payload>] {
        &self.args
    }

    /// Return value, once the call has succeeded
    #[inline]
    #[must_use]
    pub fn returned(&self) -> Option<&Payload> {
        self.returned.as_ref()
    }

    /// Store the return value
    #[inline]
    pub fn set_returned(&mut self, returned: Option<Payload>) {
        self.returned = returned;
    }

    /// Call site handed to strategy hooks
    #[must_use]
    pub fn call_site<'a>(&'a self, descriptor: &'a OperationDescriptor) -> CallSite<'a> {
        CallSite::new(&self.class, &self.method)
            .with_target(descriptor.target())
            .with_action(descriptor.action())
    }
}

/// Conversion of a business return value into an optional payload
///
/// `None` means "no return value" and disables return-based recording for
/// the call.
pub trait ReturnValue {
    /// Payload to record, if any
    fn to_payload(&self) -> Option<Payload>;
}

impl ReturnValue for () {
    fn to_payload(&self) -> Option<Payload> {
        None
    }
}

impl ReturnValue for Payload {
    fn to_payload(&self) -> Option<Payload> {
        Some(self.clone())
    }
}

impl<T: ReturnValue> ReturnValue for Option<T> {
    fn to_payload(&self) -> Option<Payload> {
        self.as_ref().and_then(ReturnValue::to_payload)
    }
}

impl<T: Any + Send + Sync> ReturnValue for Arc<T> {
    fn to_payload(&self) -> Option<Payload> {
        Some(Payload::from_arc(Arc::clone(self)))
    }
}

impl<T: Clone + Any + Send + Sync> ReturnValue for Vec<T> {
    fn to_payload(&self) -> Option<Payload> {
        Some(Payload::new(self.clone()))
    }
}

/// Implement [`ReturnValue`] for `Clone` types that are always present
///
/// ```rust,ignore
/// #[derive(Clone)]
/// struct User { id: i64 }
///
/// oprec_core::impl_return_value!(User);
/// ```
#[macro_export]
macro_rules! impl_return_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ReturnValue for $ty {
                fn to_payload(&self) -> ::std::option::Option<$crate::Payload> {
                    ::std::option::Option::Some($crate::Payload::new(
                        ::std::clone::Clone::clone(self),
                    ))
                }
            }
        )+
    };
}

impl_return_value!(
    String,
    &'static str,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ticket {
        id: u32,
    }

    crate::impl_return_value!(Ticket);

    #[test]
    fn context_builder() {
        let ctx = InvocationContext::new("UserService", "update")
            .with_arg(7_i64)
            .with_null_arg()
            .with_arg(String::from("X"));

        assert_eq!(ctx.class(), "UserService");
        assert_eq!(ctx.method(), "update");
        assert_eq!(ctx.args().len(), 3);
        assert!(ctx.args()[1].is_none());
        assert!(ctx.returned().is_none());
    }

    #[test]
    fn call_site_carries_labels() {
        let ctx = InvocationContext::new("UserService", "delete");
        let descriptor = OperationDescriptor::default()
            .with_target("USER")
            .with_action("DELETE");
        let site = ctx.call_site(&descriptor);

        assert_eq!(site.class(), "UserService");
        assert_eq!(site.method(), "delete");
        assert_eq!(site.target(), Some("USER"));
        assert_eq!(site.action(), Some("DELETE"));
    }

    #[test]
    fn unit_return_is_absent() {
        assert!(().to_payload().is_none());
        assert!(Option::<Ticket>::None.to_payload().is_none());
        assert!(Some(()).to_payload().is_none());
    }

    #[test]
    fn present_returns_convert() {
        let ticket = Some(Ticket { id: 3 }).to_payload().unwrap();
        assert_eq!(ticket.downcast_ref::<Ticket>(), Some(&Ticket { id: 3 }));
        assert_eq!(42_u64.to_payload().unwrap().downcast_ref::<u64>(), Some(&42));
        assert!(vec![1_u8].to_payload().unwrap().is::<Vec<u8>>());
    }

    #[test]
    fn payload_and_arc_keep_identity() {
        let payload = Payload::new(Ticket { id: 1 });
        assert!(payload.to_payload().unwrap().ptr_eq(&payload));

        let shared = Arc::new(Ticket { id: 2 });
        let converted = shared.to_payload().unwrap();
        assert!(Arc::ptr_eq(&converted.downcast_arc::<Ticket>().unwrap(), &shared));
    }
}
