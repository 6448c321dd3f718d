//! Strategy capability variants and hook routing
//!
//! Every strategy declares exactly one [`Capability`]. The pipeline branches
//! on the declared capability to decide whether prior state is captured and
//! which recording [`Hook`] receives the call's data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability variant declared by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Arbitrary old/new data, return value unsupported
    Basic,

    /// Captures prior state through a query before the call executes
    NeedsQuery,

    /// The extracted argument is both the "before" and the "after" value
    ParamOnly,

    /// Records only the call's return value
    ReturnOnly,
}

impl Capability {
    /// All capability variants
    pub const ALL: [Self; 4] = [
        Self::Basic,
        Self::NeedsQuery,
        Self::ParamOnly,
        Self::ReturnOnly,
    ];

    /// Stable snake_case name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::NeedsQuery => "needs_query",
            Self::ParamOnly => "param_only",
            Self::ReturnOnly => "return_only",
        }
    }

    /// Whether the variant cannot record anything without a "before" value
    #[inline]
    #[must_use]
    pub const fn requires_capture(self) -> bool {
        matches!(self, Self::NeedsQuery | Self::ParamOnly)
    }

    /// Whether recorded data comes from the extracted argument
    #[inline]
    #[must_use]
    pub const fn records_arguments(self) -> bool {
        matches!(self, Self::NeedsQuery | Self::ParamOnly)
    }

    /// Whether recorded data comes from the return value
    #[inline]
    #[must_use]
    pub const fn records_return(self) -> bool {
        matches!(self, Self::ReturnOnly)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy hook invoked by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    /// Prior-state capture before the call
    Capture,

    /// Single-argument recording (new data only)
    Record,

    /// Two-argument recording (old and new data)
    RecordChange,

    /// Return-value recording
    RecordReturn,
}

impl Hook {
    /// Stable snake_case name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Record => "record",
            Self::RecordChange => "record_change",
            Self::RecordReturn => "record_return",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_required_only_for_argument_variants() {
        assert!(!Capability::Basic.requires_capture());
        assert!(Capability::NeedsQuery.requires_capture());
        assert!(Capability::ParamOnly.requires_capture());
        assert!(!Capability::ReturnOnly.requires_capture());
    }

    #[test]
    fn recording_sources_are_exclusive() {
        for capability in Capability::ALL {
            assert!(!(capability.records_arguments() && capability.records_return()));
        }
        assert!(!Capability::Basic.records_arguments());
        assert!(!Capability::Basic.records_return());
    }

    #[test]
    fn display_names() {
        assert_eq!(Capability::NeedsQuery.to_string(), "needs_query");
        assert_eq!(Hook::RecordChange.to_string(), "record_change");
    }
}
