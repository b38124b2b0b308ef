//! Prelude module for convenient imports.
//!
//! `use formgate_validator::prelude::*;` brings in the configuration types,
//! the builder, the manager and the result types most callers need.

// ============================================================================
// FOUNDATION: Results, traits, errors, services
// ============================================================================

pub use crate::foundation::{
    AsyncCondition, Condition, ConditionCategory, ConditionError, ConditionEvaluateResult,
    ConditionNode, ConditionOutcome, ConfigError, ConfigResult, EvaluateResult, IssueFound,
    MapLocalizer, MessageToken, PendingEvaluation, TextLocalizer, ValidationServices,
    ValidationSettings, ValidationSeverity, ValidationStatus, ValueHostValidationState,
    ValueResolver,
};

// ============================================================================
// CONFIGURATION: Data-driven rules and the fluent builder
// ============================================================================

pub use crate::builder::{FieldBuilder, ValueHostsBuilder};
pub use crate::config::{
    ConditionConfig, ValidatorConfig, ValueHostConfig, ValueHostKind, ValueHostsConfig,
    condition_types,
};
pub use crate::registry::ConditionRegistry;

// ============================================================================
// RUNTIME: Manager, fields, business-logic errors
// ============================================================================

pub use crate::manager::{ValidateAllResult, ValidationManager};
pub use crate::validation::{
    BusinessLogicError, PendingValidation, ValidateOptions, ValueHost, ValueHostValidateResult,
};

// ============================================================================
// MERGING: Layered configuration changes
// ============================================================================

pub use crate::merge::{CombineUsing, ConfigModifier, MergeStrategy};
