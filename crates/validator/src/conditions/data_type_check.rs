//! Data type condition

use super::FieldRef;
use crate::config::{ConditionConfig, condition_types, params};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult,
    EvaluateResult, MessageToken, ValueResolver,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// JSON shapes a field value can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A number without a fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl DataType {
    /// Returns true when `value` has this shape.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" | "float" => Ok(Self::Number),
            "integer" | "int" => Ok(Self::Integer),
            "boolean" | "bool" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(format!("unknown data type '{other}'")),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Matches when the value has the expected [`DataType`]. A missing value is
/// `Undetermined`.
#[derive(Debug, Clone)]
pub struct DataTypeCheck {
    field: FieldRef,
    category: ConditionCategory,
    data_type: DataType,
}

impl DataTypeCheck {
    /// Creates a check on the validated field.
    pub fn new(data_type: DataType) -> Self {
        Self {
            field: FieldRef::default(),
            category: ConditionCategory::DataTypeCheck,
            data_type,
        }
    }

    /// Builds from a config. `dataType` is required.
    pub fn from_config(config: &ConditionConfig) -> ConfigResult<Self> {
        let data_type = config
            .required_str_param(params::DATA_TYPE)?
            .parse()
            .map_err(|reason: String| {
                ConfigError::invalid_parameter(
                    config.condition_type.clone(),
                    params::DATA_TYPE,
                    reason,
                )
            })?;
        Ok(Self {
            field: FieldRef::new(config.value_host_name.clone()),
            category: config.category_or(ConditionCategory::DataTypeCheck),
            data_type,
        })
    }

    /// The expected type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

impl Condition for DataTypeCheck {
    fn condition_type(&self) -> &str {
        condition_types::DATA_TYPE_CHECK
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
            Some(value) => self.data_type.accepts(&value).into(),
        })
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.field.gather(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        vec![("DataType", self.data_type.to_string())]
    }
}
