//! Operation record assembled by strategies
//!
//! [`OperationRecord`] bundles everything a strategy learns about one call.
//! Strategies build it inside their hooks and hand it to whatever sink they
//! own; the pipeline itself never creates one.

use crate::payload::Payload;
use crate::strategy::CallSite;
use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

/// Before/after record of one intercepted call
#[derive(Debug, Clone)]
pub struct OperationRecord {
    /// Unique, time-ordered record id
    pub id: Ulid,
    /// Declaring class (or type) name
    pub class: String,
    /// Method name
    pub method: String,
    /// Target label
    pub target: Option<String>,
    /// Action label
    pub action: Option<String>,
    /// When the record was assembled
    pub recorded_at: DateTime<Utc>,
    /// Prior state
    pub old_data: Option<Payload>,
    /// Extracted argument
    pub new_data: Option<Payload>,
    /// Call's return value
    pub returned: Option<Payload>,
}

impl OperationRecord {
    /// Create empty record for a call site
    ///
    /// A missing site leaves class and method empty.
    #[must_use]
    pub fn new(site: Option<&CallSite<'_>>) -> Self {
        Self {
            id: Ulid::new(),
            class: site.map(|s| s.class().to_owned()).unwrap_or_default(),
            method: site.map(|s| s.method().to_owned()).unwrap_or_default(),
            target: site.and_then(CallSite::target).map(str::to_owned),
            action: site.and_then(CallSite::action).map(str::to_owned),
            recorded_at: Utc::now(),
            old_data: None,
            new_data: None,
            returned: None,
        }
    }

    /// Set prior state
    #[inline]
    #[must_use]
    pub fn with_old(mut self, old_data: &Payload) -> Self {
        self.old_data = Some(old_data.clone());
        self
    }

    /// Set new data
    #[inline]
    #[must_use]
    pub fn with_new(mut self, new_data: &Payload) -> Self {
        self.new_data = Some(new_data.clone());
        self
    }

    /// Set return value
    #[inline]
    #[must_use]
    pub fn with_returned(mut self, returned: &Payload) -> Self {
        self.returned = Some(returned.clone());
        self
    }

    /// Whether old and new data are the same object
    #[must_use]
    pub fn is_self_comparison(&self) -> bool {
        match (&self.old_data, &self.new_data) {
            (Some(old), Some(new)) => old.ptr_eq(new),
            _ => false,
        }
    }

    /// Serializable view naming payload types instead of values
    #[must_use]
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id.to_string(),
            class: self.class.clone(),
            method: self.method.clone(),
            target: self.target.clone(),
            action: self.action.clone(),
            recorded_at: self.recorded_at,
            old_type: self.old_data.as_ref().map(Payload::type_name),
            new_type: self.new_data.as_ref().map(Payload::type_name),
            returned_type: self.returned.as_ref().map(Payload::type_name),
        }
    }
}

/// Serializable summary of an [`OperationRecord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    /// Record id
    pub id: String,
    /// Declaring class name
    pub class: String,
    /// Method name
    pub method: String,
    /// Target label
    pub target: Option<String>,
    /// Action label
    pub action: Option<String>,
    /// Assembly time
    pub recorded_at: DateTime<Utc>,
    /// Type of prior state
    pub old_type: Option<&'static str>,
    /// Type of new data
    pub new_type: Option<&'static str>,
    /// Type of return value
    pub returned_type: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_from_site() {
        let site = CallSite::new("OrderService", "cancel")
            .with_target(Some("ORDER"))
            .with_action(Some("DELETE"));
        let record = OperationRecord::new(Some(&site));

        assert_eq!(record.class, "OrderService");
        assert_eq!(record.method, "cancel");
        assert_eq!(record.target.as_deref(), Some("ORDER"));
        assert_eq!(record.action.as_deref(), Some("DELETE"));
        assert!(record.old_data.is_none());
    }

    #[test]
    fn record_without_site() {
        let record = OperationRecord::new(None);
        assert!(record.class.is_empty());
        assert!(record.target.is_none());
    }

    #[test]
    fn record_ids_are_unique() {
        let a = OperationRecord::new(None);
        let b = OperationRecord::new(None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn self_comparison_detected() {
        let arg = Payload::new(String::from("X"));
        let record = OperationRecord::new(None).with_old(&arg).with_new(&arg);
        assert!(record.is_self_comparison());

        let other = OperationRecord::new(None)
            .with_old(&Payload::new(String::from("X")))
            .with_new(&arg);
        assert!(!other.is_self_comparison());
    }

    #[test]
    fn summary_serializes_type_names() {
        let record = OperationRecord::new(Some(&CallSite::new("UserService", "find")))
            .with_returned(&Payload::new(42_u64));
        let json = serde_json::to_value(record.summary()).unwrap();

        assert_eq!(json["class"], "UserService");
        assert_eq!(json["returned_type"], "u64");
        assert!(json["old_type"].is_null());
    }
}
