//! WHEN combinator - conditional validation
//!
//! [`When`] evaluates its child only while the enabler matches. When the
//! enabler does not match, `When` answers `Undetermined`, so a disabled rule
//! never produces an issue and never makes a field valid on its own.
//!
//! The enabler is evaluated without a value host name: it must name the field
//! it reads. The child is evaluated against the field being validated.
//!
//! `When` is the one combinator whose child may be asynchronous. The node is
//! built as [`ConditionNode::Async`] in that case, and only the validator
//! layer can then hold it.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formgate_validator::config::ConditionConfig;
//!
//! // "phone is required when contact preference is 'phone'"
//! let config = ConditionConfig::when(
//!     ConditionConfig::equal_to_value("phone").with_value_host("contact_by"),
//!     ConditionConfig::require_text(),
//! );
//! ```

use crate::config::{ConditionConfig, condition_types};
use crate::foundation::{
    AsyncCondition, Condition, ConditionCategory, ConditionEvaluateResult, ConditionNode,
    ConditionOutcome, ConfigError, ConfigResult, EvaluateResult, MessageToken, ValueResolver,
};
use crate::registry::ConditionRegistry;
use std::collections::BTreeSet;

/// Conditionally evaluates a child based on an enabler.
#[derive(Debug)]
pub struct When {
    condition_type: String,
    category: ConditionCategory,
    enabler: Box<dyn Condition>,
    child: ConditionNode,
}

impl When {
    /// Creates a `When`. The category defaults to the child's.
    pub fn new(enabler: Box<dyn Condition>, child: ConditionNode) -> Self {
        Self {
            condition_type: condition_types::WHEN.to_owned(),
            category: child.category(),
            enabler,
            child,
        }
    }

    /// Builds from a config. Both `enabler` and `child` are required; the
    /// enabler must be synchronous.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        let missing = |slot| ConfigError::MissingChildCondition {
            condition_type: config.condition_type.clone(),
            slot,
        };
        let enabler = config.enabler.as_deref().ok_or_else(|| missing("enabler"))?;
        let child = config.child.as_deref().ok_or_else(|| missing("child"))?;

        let enabler = registry.create_sync(enabler, &config.condition_type)?;
        let child = registry.create(child)?;
        Ok(Self {
            condition_type: config.condition_type.clone(),
            category: config.category_or(child.category()),
            enabler,
            child,
        })
    }

    /// Wraps into a node of the same capability as the child.
    pub fn into_node(self) -> ConditionNode {
        if self.child.is_async() {
            ConditionNode::from_async(self)
        } else {
            ConditionNode::from_sync(self)
        }
    }

    /// The enabling condition.
    pub fn enabler(&self) -> &dyn Condition {
        self.enabler.as_ref()
    }

    /// The conditional child.
    pub fn child(&self) -> &ConditionNode {
        &self.child
    }

    /// Returns true when the enabler matches.
    pub fn is_enabled(&self, values: &dyn ValueResolver) -> EvaluateResult<bool> {
        Ok(self.enabler.evaluate(None, values)?.is_match())
    }

    fn gather(&self, names: &mut BTreeSet<String>) {
        self.enabler.gather_value_host_names(names);
        self.child.gather_value_host_names(names);
    }
}

impl Condition for When {
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
        if !self.is_enabled(values)? {
            return Ok(ConditionEvaluateResult::Undetermined);
        }
        self.child
            .evaluate_sync(&self.condition_type, value_host_name, values)
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.gather(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        self.child.message_tokens()
    }
}

impl AsyncCondition for When {
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
    ) -> EvaluateResult<ConditionOutcome> {
        if !self.is_enabled(values)? {
            return Ok(ConditionOutcome::Ready(ConditionEvaluateResult::Undetermined));
        }
        self.child.evaluate(value_host_name, values)
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.gather(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        self.child.message_tokens()
    }
}
