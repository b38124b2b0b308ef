//! Core validation types and traits
//!
//! This module contains the building blocks every other module uses:
//!
//! - **Results**: [`ConditionEvaluateResult`], [`ValidationStatus`],
//!   [`ValidationSeverity`], [`IssueFound`]
//! - **Traits**: [`Condition`], [`AsyncCondition`], [`ConditionNode`]
//! - **Errors**: [`ConfigError`], [`ConditionError`]
//! - **Values**: [`ValueResolver`]
//! - **Services**: [`ValidationServices`], [`TextLocalizer`], [`ValidationSettings`]
//!
//! # Tri-state evaluation
//!
//! ```rust,ignore
//! use formgate_validator::foundation::*;
//!
//! let result = node.evaluate(Some("email"), &values)?;
//! match result.ready() {
//!     Some(ConditionEvaluateResult::Match) => { /* valid */ }
//!     Some(ConditionEvaluateResult::NoMatch) => { /* issue */ }
//!     Some(ConditionEvaluateResult::Undetermined) => { /* no opinion */ }
//!     None => { /* pending, awaited by the orchestrator */ }
//! }
//! ```

pub mod category;
pub mod error;
pub mod result;
pub mod services;
pub mod traits;
pub mod values;

pub use category::{ConditionCategory, sort_by_category};
pub use error::{ConditionError, ConfigError, ConfigResult, EvaluateResult};
pub use result::{
    ConditionEvaluateResult, IssueFound, ValidationSeverity, ValidationStatus,
    ValueHostValidationState,
};
pub use services::{
    FallbackLocalizer, MapLocalizer, TextLocalizer, ValidationServices, ValidationSettings,
};
pub use traits::{
    AsyncCondition, Condition, ConditionNode, ConditionOutcome, MessageToken, PendingEvaluation,
};
pub use values::{NoValues, ValueResolver, display_value};
