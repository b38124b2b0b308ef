//! Poisoned condition

use crate::config::condition_types;
use crate::foundation::{
    Condition, ConditionCategory, ConditionError, ConditionEvaluateResult, EvaluateResult,
    ValueResolver,
};

/// Stands in for a condition that could not be produced, such as a
/// `condition_creator` that returned nothing. Every evaluation fails, so the
/// orchestrator logs it and the validator reports `Undetermined`.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    message: String,
}

impl ErrorResponse {
    /// Creates a poisoned condition carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Why the real condition is missing.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Condition for ErrorResponse {
    fn condition_type(&self) -> &str {
        condition_types::ERROR_RESPONSE
    }

    fn category(&self) -> ConditionCategory {
        ConditionCategory::Undetermined
    }

    fn evaluate(
        &self,
        _value_host_name: Option<&str>,
        _values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        Err(ConditionError::failed(
            condition_types::ERROR_RESPONSE,
            self.message.clone(),
        ))
    }
}
