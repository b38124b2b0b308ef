//! Tri-state evaluation results and field-level validation outcomes
//!
//! A condition never answers with a plain `bool`: it either matches, does not
//! match, or cannot make a determination (missing value, wrong shape, disabled
//! by an enabler). Validators turn those answers into [`IssueFound`]s and a
//! field-level [`ValidationStatus`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CONDITION RESULT
// ============================================================================

/// Result of evaluating one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionEvaluateResult {
    /// The predicate does not hold.
    NoMatch,
    /// The predicate holds.
    Match,
    /// No determination could be made.
    Undetermined,
}

impl ConditionEvaluateResult {
    /// Returns true for `Match`.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    /// Returns true for `NoMatch`.
    #[must_use]
    pub const fn is_no_match(self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Returns true for `Undetermined`.
    #[must_use]
    pub const fn is_undetermined(self) -> bool {
        matches!(self, Self::Undetermined)
    }

    /// Logical negation. `Undetermined` is a fixed point.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Match => Self::NoMatch,
            Self::NoMatch => Self::Match,
            Self::Undetermined => Self::Undetermined,
        }
    }

    /// Replaces `Undetermined` with `replacement`; determinate results pass through.
    #[must_use]
    pub const fn or_treat_undetermined_as(self, replacement: Self) -> Self {
        match self {
            Self::Undetermined => replacement,
            other => other,
        }
    }
}

impl From<bool> for ConditionEvaluateResult {
    fn from(value: bool) -> Self {
        if value { Self::Match } else { Self::NoMatch }
    }
}

impl fmt::Display for ConditionEvaluateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoMatch => "NoMatch",
            Self::Match => "Match",
            Self::Undetermined => "Undetermined",
        };
        f.write_str(name)
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

/// How seriously a failed validator affects its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidationSeverity {
    /// Reported, but never makes the field invalid.
    Warning,
    /// Makes the field invalid (default).
    #[default]
    Error,
    /// Makes the field invalid and stops the remaining validators of the field.
    Severe,
}

impl ValidationSeverity {
    /// Returns true when an issue of this severity invalidates the field.
    #[must_use]
    pub const fn invalidates(self) -> bool {
        !matches!(self, Self::Warning)
    }
}

// ============================================================================
// FIELD STATUS
// ============================================================================

/// Field-level validation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// Not validated yet, or every validator was skipped or undetermined.
    #[default]
    Undetermined,
    /// At least one validator matched and none invalidated the field.
    Valid,
    /// At least one Error or Severe issue was found.
    Invalid,
}

impl ValidationStatus {
    /// Folds one validator answer into the running status.
    ///
    /// `Match` (and a Warning-level `NoMatch`) lifts `Undetermined` to `Valid`
    /// but never overrides `Invalid`. An Error/Severe `NoMatch` always yields
    /// `Invalid`. `Undetermined` leaves the status untouched.
    #[must_use]
    pub const fn fold(self, result: ConditionEvaluateResult, severity: ValidationSeverity) -> Self {
        match result {
            ConditionEvaluateResult::Undetermined => self,
            ConditionEvaluateResult::NoMatch if severity.invalidates() => Self::Invalid,
            ConditionEvaluateResult::Match | ConditionEvaluateResult::NoMatch => match self {
                Self::Invalid => Self::Invalid,
                Self::Undetermined | Self::Valid => Self::Valid,
            },
        }
    }
}

// ============================================================================
// ISSUES
// ============================================================================

/// One surfaced validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFound {
    /// Field the issue belongs to.
    pub value_host_name: String,
    /// Correlates the issue with the validator (or business rule) that produced it.
    pub error_code: String,
    /// Severity of the failed validator.
    pub severity: ValidationSeverity,
    /// Message shown next to the field.
    pub error_message: String,
    /// Message shown in a validation summary.
    pub summary_message: String,
}

/// Snapshot of one field's validation state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHostValidationState {
    /// Field name.
    pub value_host_name: String,
    /// Aggregate status.
    pub status: ValidationStatus,
    /// Issues found, in validator order followed by free-standing business-logic errors.
    pub issues_found: Vec<IssueFound>,
    /// True while asynchronous validators of the current pass are still in flight.
    pub async_pending: bool,
    /// True when this pass moved the field from `Invalid` to `Valid`.
    pub corrected: bool,
}

impl ValueHostValidationState {
    /// Creates an untouched state for a field.
    pub fn new(value_host_name: impl Into<String>) -> Self {
        Self {
            value_host_name: value_host_name.into(),
            ..Self::default()
        }
    }

    /// Returns true when the status is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }

    /// Returns the issue with the given error code, if any.
    #[must_use]
    pub fn issue(&self, error_code: &str) -> Option<&IssueFound> {
        self.issues_found.iter().find(|i| i.error_code == error_code)
    }
}
