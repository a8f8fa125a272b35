//! Validation domain module.
//!
//! Rule-based checks with no shared state between rules:
//!
//! - `naming` - feature flag naming conventions
//! - `conflicts` - pairwise overlap between running experiments

pub mod conflicts;
pub mod naming;

use schemars::JsonSchema;
use serde::Serialize;

pub use conflicts::{ConflictReport, ExperimentDescriptor, detect_conflicts};
pub use naming::{FlagNameReport, NamingConvention, check_flag_name};

/// Verdict of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
    Warning,
}

/// Outcome of one rule, with an optional corrected value.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule: String,
    pub status: RuleStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl RuleResult {
    fn new(rule: &str, status: RuleStatus, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            status,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn pass(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::Pass, message)
    }

    pub fn fail(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::Fail, message)
    }

    pub fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, RuleStatus::Warning, message)
    }

    /// Attach an auto-corrected value.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
