//! Built-in leaf conditions
//!
//! A deliberately small set. Leaves read one field, answer `Undetermined`
//! when the value is missing or has the wrong shape, and leave emptiness to
//! [`RequireText`].
//!
//! - [`RequireText`] (Require)
//! - [`DataTypeCheck`] (DataTypeCheck)
//! - [`EqualToValue`] (Comparison)
//! - [`RegExp`] (Comparison)
//! - [`ErrorResponse`]: stand-in for a condition that could not be produced

pub mod data_type_check;
pub mod equal_to_value;
pub mod error_response;
pub mod regexp;
pub mod require_text;

pub use data_type_check::{DataType, DataTypeCheck};
pub use equal_to_value::EqualToValue;
pub use error_response::ErrorResponse;
pub use regexp::RegExp;
pub use require_text::RequireText;

use crate::config::condition_types;
use crate::foundation::{ConditionNode, ValueResolver};
use crate::registry::ConditionRegistry;
use serde_json::Value;
use std::collections::BTreeSet;

/// Registers the factories of every leaf condition.
pub fn register_all(registry: &mut ConditionRegistry) {
    registry.register(condition_types::REQUIRE_TEXT, |config, _| {
        RequireText::from_config(config).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::DATA_TYPE_CHECK, |config, _| {
        DataTypeCheck::from_config(config).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::EQUAL_TO_VALUE, |config, _| {
        EqualToValue::from_config(config).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::REGEXP, |config, _| {
        RegExp::from_config(config).map(ConditionNode::from_sync)
    });
}

/// Field a leaf reads: its own reference first, else the validated field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRef(Option<String>);

impl FieldRef {
    /// Wraps the configured field name.
    pub fn new(value_host_name: Option<String>) -> Self {
        Self(value_host_name)
    }

    /// Resolves the value, treating JSON `null` as missing.
    pub fn resolve(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> Option<Value> {
        let name = self.0.as_deref().or(value_host_name)?;
        values.value(name).filter(|v| !v.is_null())
    }

    /// Adds the configured field name, if any.
    pub fn gather(&self, names: &mut BTreeSet<String>) {
        if let Some(name) = &self.0 {
            names.insert(name.clone());
        }
    }
}
