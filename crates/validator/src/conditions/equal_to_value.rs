//! Equality condition

use super::FieldRef;
use crate::config::{ConditionConfig, condition_types, params};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult,
    EvaluateResult, MessageToken, ValueResolver, display_value,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// Matches when the value equals `secondValue`.
///
/// Numbers compare by value, so `1` equals `1.0`. A missing value is
/// `Undetermined`.
#[derive(Debug, Clone)]
pub struct EqualToValue {
    field: FieldRef,
    category: ConditionCategory,
    second_value: Value,
}

impl EqualToValue {
    /// Creates a comparison on the validated field.
    pub fn new(second_value: impl Into<Value>) -> Self {
        Self {
            field: FieldRef::default(),
            category: ConditionCategory::Comparison,
            second_value: second_value.into(),
        }
    }

    /// Builds from a config. `secondValue` is required.
    pub fn from_config(config: &ConditionConfig) -> ConfigResult<Self> {
        let second_value = config.param(params::SECOND_VALUE).cloned().ok_or_else(|| {
            ConfigError::invalid_parameter(
                config.condition_type.clone(),
                params::SECOND_VALUE,
                "parameter is required",
            )
        })?;
        Ok(Self {
            field: FieldRef::new(config.value_host_name.clone()),
            category: config.category_or(ConditionCategory::Comparison),
            second_value,
        })
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

impl Condition for EqualToValue {
    fn condition_type(&self) -> &str {
        condition_types::EQUAL_TO_VALUE
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        Ok(match self.field.resolve(value_host_name, values) {
            None => ConditionEvaluateResult::Undetermined,
            Some(value) => values_equal(&value, &self.second_value).into(),
        })
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.field.gather(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        vec![("SecondValue", display_value(Some(&self.second_value)))]
    }
}
