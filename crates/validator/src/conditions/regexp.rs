//! Regular expression condition

use super::FieldRef;
use crate::config::{ConditionConfig, condition_types, params};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult,
    EvaluateResult, MessageToken, ValueResolver,
};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::BTreeSet;

/// Matches when the text value matches `expression`.
///
/// The pattern is compiled when the condition is built. Missing values,
/// empty strings and non-string values are `Undetermined`.
#[derive(Debug, Clone)]
pub struct RegExp {
    field: FieldRef,
    category: ConditionCategory,
    pattern: Regex,
}

impl RegExp {
    /// Compiles `expression` for the validated field.
    pub fn new(expression: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            field: FieldRef::default(),
            category: ConditionCategory::Comparison,
            pattern: Regex::new(expression)?,
        })
    }

    /// Builds from a config. `expression` is required; `ignoreCase` is optional.
    pub fn from_config(config: &ConditionConfig) -> ConfigResult<Self> {
        let expression = config.required_str_param(params::EXPRESSION)?;
        let pattern = RegexBuilder::new(expression)
            .case_insensitive(config.bool_param(params::IGNORE_CASE)?.unwrap_or(false))
            .build()
            .map_err(|e| {
                ConfigError::invalid_parameter(
                    config.condition_type.clone(),
                    params::EXPRESSION,
                    e.to_string(),
                )
            })?;
        Ok(Self {
            field: FieldRef::new(config.value_host_name.clone()),
            category: config.category_or(ConditionCategory::Comparison),
            pattern,
        })
    }
}

impl Condition for RegExp {
    fn condition_type(&self) -> &str {
        condition_types::REGEXP
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
            Some(Value::String(text)) if !text.is_empty() => self.pattern.is_match(&text).into(),
            _ => ConditionEvaluateResult::Undetermined,
        })
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.field.gather(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        vec![("Expression", self.pattern.as_str().to_owned())]
    }
}
