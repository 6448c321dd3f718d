//! oprec Strategy System
//!
//! Pluggable recording strategies for intercepted business calls.
//!
//! # Core Concepts
//!
//! - [`Capability`]: The one capability variant a strategy declares
//! - [`BasicStrategy`], [`QueryStrategy`], [`ParamStrategy`], [`ReturnStrategy`]:
//!   Per-capability hook traits implemented by strategy authors
//! - [`Strategy`]: Capability-tagged handle the pipeline dispatches through
//! - [`Payload`]: Opaque value carrier for arguments, prior state and return values
//! - [`StrategyRegistry`]: Registry for strategy resolution
//!
//! # Example
//!
//! ```rust,ignore
//! use oprec_strategy::{Strategy, StrategyRegistry, StrategyId};
//!
//! // Create registry with the no-op default
//! let registry = StrategyRegistry::with_defaults();
//!
//! // Register a user strategy
//! registry.register("user-audit", Strategy::needs_query(UserAudit::new(db)))?;
//!
//! // Resolve it
//! let strategy = registry.get(&StrategyId::new("user-audit")).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod capability;
mod error;
mod payload;
mod record;
mod registry;
mod strategy;

// Re-exports
pub use capability::{Capability, Hook};
pub use error::{BoxError, RegistryError, StrategyError};
pub use payload::Payload;
pub use record::{OperationRecord, RecordSummary};
pub use registry::{StrategyId, StrategyRegistry, StrategyResolver};
pub use strategy::{
    BasicStrategy, CallSite, NoopStrategy, ParamStrategy, QueryStrategy, ReturnStrategy, Strategy,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        id: u32,
        balance: i64,
    }

    #[derive(Debug)]
    struct AccountAudit;

    impl QueryStrategy for AccountAudit {
        fn name(&self) -> &str {
            "account-audit"
        }

        fn capture(
            &self,
            _site: Option<&CallSite<'_>>,
            new_data: Option<&Payload>,
        ) -> Result<Option<Payload>, StrategyError> {
            Ok(new_data.and_then(|d| d.downcast_ref::<Account>()).map(|a| {
                Payload::new(Account {
                    id: a.id,
                    balance: 0,
                })
            }))
        }

        fn record_change(
            &self,
            site: Option<&CallSite<'_>>,
            old_data: &Payload,
            new_data: &Payload,
        ) -> Result<(), StrategyError> {
            let record = OperationRecord::new(site).with_old(old_data).with_new(new_data);
            if record.is_self_comparison() {
                return Err(StrategyError::failed(self.name(), "expected distinct snapshots"));
            }
            Ok(())
        }
    }

    #[test]
    fn registry_integration() {
        let registry = Arc::new(StrategyRegistry::with_defaults());
        registry
            .register("account-audit", Strategy::needs_query(AccountAudit))
            .unwrap();

        let resolver: Arc<dyn StrategyResolver> = registry.clone();
        let strategy = resolver.resolve(&StrategyId::new("account-audit")).unwrap();
        assert_eq!(strategy.capability(), Capability::NeedsQuery);
        assert_eq!(strategy.name(), "account-audit");
        assert!(resolver.resolve(&StrategyId::new("missing")).is_none());
    }

    #[test]
    fn query_round_through_handle() {
        let strategy = Strategy::needs_query(AccountAudit);
        let site = CallSite::new("AccountService", "deposit");
        let new_data = Payload::new(Account { id: 4, balance: 50 });

        let old_data = strategy.capture(Some(&site), Some(&new_data)).unwrap().unwrap();
        assert_eq!(
            old_data.downcast_ref::<Account>(),
            Some(&Account { id: 4, balance: 0 })
        );
        assert!(strategy.record_change(Some(&site), &old_data, &new_data).is_ok());
        assert!(strategy
            .record_change(Some(&site), &new_data, &new_data)
            .is_err());
    }

    #[test]
    fn late_registration_visible_through_shared_registry() {
        let registry = Arc::new(StrategyRegistry::new());
        let resolver: Arc<dyn StrategyResolver> = registry.clone();
        assert!(resolver.resolve(&StrategyId::DEFAULT).is_none());

        registry
            .register(StrategyId::DEFAULT, Strategy::basic(NoopStrategy))
            .unwrap();
        assert!(resolver.resolve(&StrategyId::DEFAULT).is_some());
    }
}
