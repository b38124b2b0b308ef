//! Conditions with scripted answers for unit tests.

use crate::config::ConditionConfig;
use crate::foundation::{
    Condition, ConditionCategory, ConditionError, ConditionEvaluateResult, ConditionNode,
    EvaluateResult, ValueResolver,
};
use crate::registry::ConditionRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const FIXED: &str = "Fixed";
pub(crate) const FAILING: &str = "Failing";

/// Answers with a fixed result and counts how often it was asked.
#[derive(Debug, Clone)]
pub(crate) struct Fixed {
    pub result: ConditionEvaluateResult,
    pub category: ConditionCategory,
    pub calls: Arc<AtomicUsize>,
}

impl Fixed {
    pub fn new(result: ConditionEvaluateResult) -> Self {
        Self {
            result,
            category: ConditionCategory::Comparison,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Condition for Fixed {
    fn condition_type(&self) -> &str {
        FIXED
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        _value_host_name: Option<&str>,
        _values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }
}

/// Always fails with an evaluation error.
#[derive(Debug)]
pub(crate) struct Failing;

impl Condition for Failing {
    fn condition_type(&self) -> &str {
        FAILING
    }

    fn category(&self) -> ConditionCategory {
        ConditionCategory::Comparison
    }

    fn evaluate(
        &self,
        _value_host_name: Option<&str>,
        _values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        Err(ConditionError::failed(FAILING, "scripted failure"))
    }
}

/// Config for a `Fixed` condition answering `result`.
pub(crate) fn fixed(result: ConditionEvaluateResult) -> ConditionConfig {
    ConditionConfig::new(FIXED).with_param("result", result.to_string())
}

/// Built-in registry plus `Fixed` and `Failing`.
pub(crate) fn registry() -> ConditionRegistry {
    let mut registry = ConditionRegistry::with_builtins();
    registry.register(FIXED, |config, _| {
        let result = config
            .param("result")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(ConditionEvaluateResult::Undetermined);
        let mut fixed = Fixed::new(result);
        fixed.category = config.category_or(ConditionCategory::Comparison);
        Ok(ConditionNode::from_sync(fixed))
    });
    registry.register(FAILING, |_, _| Ok(ConditionNode::from_sync(Failing)));
    registry
}
