//! Capture classification
//!
//! Decides whether prior state must be captured before the business call
//! runs. Capture is forced by the descriptor's `comparable` or `removed`
//! flags, or by a strategy variant that cannot record without it.

use crate::descriptor::OperationDescriptor;
use oprec_strategy::Capability;
use std::fmt;

/// Why capture runs for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureReason {
    /// Descriptor requests old/new comparison
    Comparable,
    /// Descriptor marks a deletion
    Removed,
    /// Strategy variant needs prior state
    Capability(Capability),
}

impl fmt::Display for CaptureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparable => f.write_str("comparable"),
            Self::Removed => f.write_str("removed"),
            Self::Capability(c) => write!(f, "capability:{c}"),
        }
    }
}

/// Capture decision for a descriptor and resolved capability
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityClassifier;

impl CapabilityClassifier {
    /// First reason capture must run, if any
    ///
    /// `capability` is `None` when the strategy could not be resolved; only
    /// the descriptor flags count then.
    #[must_use]
    pub fn classify(
        descriptor: &OperationDescriptor,
        capability: Option<Capability>,
    ) -> Option<CaptureReason> {
        if descriptor.comparable() {
            Some(CaptureReason::Comparable)
        } else if descriptor.removed() {
            Some(CaptureReason::Removed)
        } else {
            capability
                .filter(|c| c.requires_capture())
                .map(CaptureReason::Capability)
        }
    }

    /// Whether capture must run
    #[inline]
    #[must_use]
    pub fn requires_capture(
        descriptor: &OperationDescriptor,
        capability: Option<Capability>,
    ) -> bool {
        Self::classify(descriptor, capability).is_some()
    }
}
