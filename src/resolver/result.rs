//! Resolver skip reasons
//!
//! A record that fails resolution is skipped, never fatal. The reason is
//! structured so callers can log it, aggregate it, or surface it in reports.

use serde::{Deserialize, Serialize};

/// Machine-readable reasons a record was skipped during resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SkipReason {
    /// Record explicitly turned off; expected user intent
    Disabled,

    /// Content missing or blank after trimming
    EmptyContent,

    /// Both target groups disabled; the record yields no rules
    NoTargets,

    /// Record could not be decoded (wrong shape or value type)
    Invalid(String),
}

impl SkipReason {
    /// Convert to machine-readable string format
    /// Example: "DISABLED", "INVALID:expected a string"
    pub fn to_machine_string(&self) -> String {
        match self {
            SkipReason::Disabled => "DISABLED".to_string(),
            SkipReason::EmptyContent => "EMPTY_CONTENT".to_string(),
            SkipReason::NoTargets => "NO_TARGETS".to_string(),
            SkipReason::Invalid(detail) => format!("INVALID:{}", detail),
        }
    }

    /// Whether the skip reflects user intent rather than a config problem.
    /// Informational skips are logged at info level, the rest warn.
    pub fn is_informational(&self) -> bool {
        matches!(self, SkipReason::Disabled)
    }
}
