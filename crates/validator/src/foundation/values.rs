//! Value lookup
//!
//! Conditions never own form data. They read it through a [`ValueResolver`],
//! which the caller (usually the `ValidationManager`'s value store) provides.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Supplies field values to conditions by name.
pub trait ValueResolver: Send + Sync {
    /// Returns the current value of `value_host_name`, or `None` when the field
    /// is unknown or has no value.
    fn value(&self, value_host_name: &str) -> Option<Value>;
}

impl ValueResolver for HashMap<String, Value> {
    fn value(&self, value_host_name: &str) -> Option<Value> {
        self.get(value_host_name).cloned()
    }
}

impl ValueResolver for BTreeMap<String, Value> {
    fn value(&self, value_host_name: &str) -> Option<Value> {
        self.get(value_host_name).cloned()
    }
}

impl ValueResolver for serde_json::Map<String, Value> {
    fn value(&self, value_host_name: &str) -> Option<Value> {
        self.get(value_host_name).cloned()
    }
}

/// Resolver with no values at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValues;

impl ValueResolver for NoValues {
    fn value(&self, _value_host_name: &str) -> Option<Value> {
        None
    }
}

/// Renders a value for message tokens: strings unquoted, null/absent empty.
#[must_use]
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_map_resolves_by_name() {
        let Value::Object(map) = json!({ "age": 41, "name": "Ada" }) else {
            unreachable!()
        };
        assert_eq!(map.value("age"), Some(json!(41)));
        assert_eq!(map.value("missing"), None);
    }

    #[test]
    fn display_value_unquotes_strings() {
        assert_eq!(display_value(Some(&json!("Ada"))), "Ada");
        assert_eq!(display_value(Some(&json!(3.5))), "3.5");
        assert_eq!(display_value(Some(&Value::Null)), "");
        assert_eq!(display_value(None), "");
    }
}
