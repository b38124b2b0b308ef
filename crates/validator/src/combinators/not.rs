//! NOT combinator - inverts a child condition
//!
//! `Match` becomes `NoMatch` and the reverse. `Undetermined` stays
//! `Undetermined`: inverting "no opinion" is still "no opinion".
//!
//! # Examples
//!
//! ```rust,ignore
//! use formgate_validator::config::ConditionConfig;
//!
//! // "must not be 'admin'"
//! let config = ConditionConfig::not(ConditionConfig::equal_to_value("admin"));
//! ```

use crate::config::{ConditionConfig, condition_types};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult,
    EvaluateResult, MessageToken, ValueResolver,
};
use crate::registry::ConditionRegistry;
use std::collections::BTreeSet;

/// Inverts a synchronous child condition.
#[derive(Debug)]
pub struct Not {
    condition_type: String,
    category: ConditionCategory,
    child: Box<dyn Condition>,
}

impl Not {
    /// Creates a `Not` over `child`.
    pub fn new(child: Box<dyn Condition>) -> Self {
        Self {
            condition_type: condition_types::NOT.to_owned(),
            category: ConditionCategory::Children,
            child,
        }
    }

    /// Builds from a config. The `child` slot is required.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        let child = config
            .child
            .as_deref()
            .ok_or_else(|| ConfigError::MissingChildCondition {
                condition_type: config.condition_type.clone(),
                slot: "child",
            })?;
        Ok(Self {
            condition_type: config.condition_type.clone(),
            category: config.category_or(ConditionCategory::Children),
            child: registry.create_sync(child, &config.condition_type)?,
        })
    }

    /// The inverted condition.
    pub fn child(&self) -> &dyn Condition {
        self.child.as_ref()
    }
}

impl Condition for Not {
    fn condition_type(&self) -> &str {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        Ok(self.child.evaluate(value_host_name, values)?.negate())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.child.gather_value_host_names(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        self.child.message_tokens()
    }
}
