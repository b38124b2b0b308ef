//! Required-value condition

use super::FieldRef;
use crate::config::{ConditionConfig, condition_types, params};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigResult, EvaluateResult,
    ValueResolver,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// Matches when the value is present and not empty.
///
/// Strings are trimmed first unless `trim` is `false`. Empty arrays and
/// objects count as empty. Any other non-null value matches.
#[derive(Debug, Clone)]
pub struct RequireText {
    field: FieldRef,
    category: ConditionCategory,
    trim: bool,
}

impl RequireText {
    /// Creates a condition on the validated field that trims strings.
    pub fn new() -> Self {
        Self {
            field: FieldRef::default(),
            category: ConditionCategory::Require,
            trim: true,
        }
    }

    /// Builds from a config.
    pub fn from_config(config: &ConditionConfig) -> ConfigResult<Self> {
        Ok(Self {
            field: FieldRef::new(config.value_host_name.clone()),
            category: config.category_or(ConditionCategory::Require),
            trim: config.bool_param(params::TRIM)?.unwrap_or(true),
        })
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::String(s) if self.trim => s.trim().is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Default for RequireText {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition for RequireText {
    fn condition_type(&self) -> &str {
        condition_types::REQUIRE_TEXT
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        let present = self
            .field
            .resolve(value_host_name, values)
            .is_some_and(|value| !self.is_empty(&value));
        Ok(present.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.field.gather(names);
    }
}
