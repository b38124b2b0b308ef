//! Condition configuration
//!
//! A [`ConditionConfig`] is plain data: a type identifier, an optional
//! category override, the field it reads, structural children and a bag of
//! type-specific parameters. The `ConditionRegistry` turns it into a
//! `ConditionNode`. Configs are never mutated once published; composition
//! (wrapping in `All`, `When`...) builds new values.

use crate::foundation::{ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type identifiers of the conditions this crate registers.
pub mod condition_types {
    /// Every child must match.
    pub const ALL: &str = "All";
    /// At least one child must match.
    pub const ANY: &str = "Any";
    /// Inverts its child.
    pub const NOT: &str = "Not";
    /// Number of matching children must be within a range.
    pub const COUNT_MATCHES: &str = "CountMatches";
    /// Child only counts when the enabler matches.
    pub const WHEN: &str = "When";
    /// Value must be non-empty text.
    pub const REQUIRE_TEXT: &str = "RequireText";
    /// Value must have the configured data type.
    pub const DATA_TYPE_CHECK: &str = "DataTypeCheck";
    /// Value must equal a fixed value.
    pub const EQUAL_TO_VALUE: &str = "EqualToValue";
    /// Value must match a regular expression.
    pub const REGEXP: &str = "RegExp";
    /// Stand-in for a condition that could not be produced.
    pub const ERROR_RESPONSE: &str = "ErrorResponse";
    /// Error code used when nothing better can be resolved.
    pub const UNKNOWN: &str = "Unknown";
}

/// Parameter keys shared by several conditions.
pub mod params {
    /// Remap for undetermined children of `All`/`Any`/`CountMatches`.
    pub const TREAT_UNDETERMINED_AS: &str = "treatUndeterminedAs";
    /// Lower bound of `CountMatches`.
    pub const MINIMUM: &str = "minimum";
    /// Upper bound of `CountMatches`.
    pub const MAXIMUM: &str = "maximum";
    /// Value compared by `EqualToValue`.
    pub const SECOND_VALUE: &str = "secondValue";
    /// Pattern of `RegExp`.
    pub const EXPRESSION: &str = "expression";
    /// Case-insensitive flag of `RegExp`.
    pub const IGNORE_CASE: &str = "ignoreCase";
    /// Whitespace handling of `RequireText`.
    pub const TRIM: &str = "trim";
    /// Expected type of `DataTypeCheck`.
    pub const DATA_TYPE: &str = "dataType";
}

/// Description of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfig {
    /// Registry key of the condition.
    pub condition_type: String,

    /// Overrides the condition's default category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ConditionCategory>,

    /// Field the condition reads. Defaults to the field being validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_host_name: Option<String>,

    /// Children of `All`, `Any` and `CountMatches`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConditionConfig>,

    /// Child of `Not` and `When`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<ConditionConfig>>,

    /// Enabler of `When`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabler: Option<Box<ConditionConfig>>,

    /// Type-specific parameters.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ConditionConfig {
    /// Creates a config of the given type with no parameters.
    pub fn new(condition_type: impl Into<String>) -> Self {
        Self {
            condition_type: condition_type.into(),
            category: None,
            value_host_name: None,
            children: Vec::new(),
            child: None,
            enabler: None,
            params: Map::new(),
        }
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// `All` over `children`.
    pub fn all(children: Vec<ConditionConfig>) -> Self {
        Self::new(condition_types::ALL).with_children(children)
    }

    /// `Any` over `children`.
    pub fn any(children: Vec<ConditionConfig>) -> Self {
        Self::new(condition_types::ANY).with_children(children)
    }

    /// `Not` wrapping `child`.
    pub fn not(child: ConditionConfig) -> Self {
        Self::new(condition_types::NOT).with_child(child)
    }

    /// `CountMatches` over `children` with inclusive optional bounds.
    pub fn count_matches(
        minimum: Option<u32>,
        maximum: Option<u32>,
        children: Vec<ConditionConfig>,
    ) -> Self {
        let mut config = Self::new(condition_types::COUNT_MATCHES).with_children(children);
        if let Some(min) = minimum {
            config = config.with_param(params::MINIMUM, min);
        }
        if let Some(max) = maximum {
            config = config.with_param(params::MAXIMUM, max);
        }
        config
    }

    /// `When`: `child` only counts while `enabler` matches.
    pub fn when(enabler: ConditionConfig, child: ConditionConfig) -> Self {
        Self::new(condition_types::WHEN)
            .with_enabler(enabler)
            .with_child(child)
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    /// `RequireText` on the validated field.
    pub fn require_text() -> Self {
        Self::new(condition_types::REQUIRE_TEXT)
    }

    /// `DataTypeCheck` against `data_type` (`String`, `Number`, `Integer`,
    /// `Boolean`, `Array`, `Object`).
    pub fn data_type_check(data_type: impl Into<String>) -> Self {
        Self::new(condition_types::DATA_TYPE_CHECK).with_param(params::DATA_TYPE, data_type.into())
    }

    /// `EqualToValue` against `second_value`.
    pub fn equal_to_value(second_value: impl Into<Value>) -> Self {
        Self::new(condition_types::EQUAL_TO_VALUE).with_param(params::SECOND_VALUE, second_value)
    }

    /// `RegExp` with `expression`.
    pub fn regexp(expression: impl Into<String>) -> Self {
        Self::new(condition_types::REGEXP).with_param(params::EXPRESSION, expression.into())
    }

    // ------------------------------------------------------------------
    // Builder methods
    // ------------------------------------------------------------------

    /// Overrides the category.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_category(mut self, category: ConditionCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Makes the condition read `value_host_name` instead of the validated field.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_value_host(mut self, value_host_name: impl Into<String>) -> Self {
        self.value_host_name = Some(value_host_name.into());
        self
    }

    /// Sets a type-specific parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces the children list.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_children(mut self, children: Vec<ConditionConfig>) -> Self {
        self.children = children;
        self
    }

    /// Sets the single child.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_child(mut self, child: ConditionConfig) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Sets the enabler.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_enabler(mut self, enabler: ConditionConfig) -> Self {
        self.enabler = Some(Box::new(enabler));
        self
    }

    /// Sets `treatUndeterminedAs`.
    #[must_use = "builder methods must be chained or built"]
    pub fn treat_undetermined_as(self, result: ConditionEvaluateResult) -> Self {
        let value = match result {
            ConditionEvaluateResult::Match => "Match",
            ConditionEvaluateResult::NoMatch => "NoMatch",
            ConditionEvaluateResult::Undetermined => "Undetermined",
        };
        self.with_param(params::TREAT_UNDETERMINED_AS, value)
    }

    // ------------------------------------------------------------------
    // Accessors used by factories
    // ------------------------------------------------------------------

    /// Returns true when this is a `When` condition.
    #[must_use]
    pub fn is_when(&self) -> bool {
        self.condition_type == condition_types::WHEN
    }

    /// The configured category, or `default`.
    #[must_use]
    pub fn category_or(&self, default: ConditionCategory) -> ConditionCategory {
        self.category.unwrap_or(default)
    }

    /// Raw parameter value.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key).filter(|v| !v.is_null())
    }

    /// String parameter; present but not a string is an error.
    pub fn str_param(&self, key: &str) -> ConfigResult<Option<&str>> {
        match self.param(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// Required string parameter.
    pub fn required_str_param(&self, key: &str) -> ConfigResult<&str> {
        self.str_param(key)?
            .ok_or_else(|| self.invalid(key, "parameter is required"))
    }

    /// Boolean parameter.
    pub fn bool_param(&self, key: &str) -> ConfigResult<Option<bool>> {
        match self.param(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    /// Non-negative integer parameter.
    pub fn u32_param(&self, key: &str) -> ConfigResult<Option<u32>> {
        match self.param(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, "expected a non-negative integer")),
        }
    }

    /// `treatUndeterminedAs`, defaulting to `Undetermined`.
    pub fn undetermined_policy(&self) -> ConfigResult<ConditionEvaluateResult> {
        match self.param(params::TREAT_UNDETERMINED_AS) {
            None => Ok(ConditionEvaluateResult::Undetermined),
            Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
                self.invalid(
                    params::TREAT_UNDETERMINED_AS,
                    "expected Match, NoMatch or Undetermined",
                )
            }),
        }
    }

    fn invalid(&self, key: &str, reason: &str) -> ConfigError {
        ConfigError::invalid_parameter(self.condition_type.clone(), key, reason)
    }
}
