//! ALL / ANY combinators - conjunction and disjunction over child conditions
//!
//! Children are evaluated in declaration order. A child answering
//! `Undetermined` is first remapped through `treatUndeterminedAs` (default:
//! stays `Undetermined`); an `Undetermined` that survives the remap ends the
//! evaluation with `Undetermined`. Otherwise:
//!
//! - [`All`] answers `NoMatch` at the first `NoMatch`, `Match` when every child matched.
//! - [`Any`] answers `Match` at the first `Match`, `NoMatch` when none matched.
//!
//! An empty child list answers `Undetermined`.

use crate::config::{ConditionConfig, condition_types};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigResult, EvaluateResult,
    ValueResolver,
};
use crate::registry::ConditionRegistry;
use std::collections::BTreeSet;

// ============================================================================
// CHILD LIST
// ============================================================================

/// Ordered synchronous children plus the undetermined remap policy.
#[derive(Debug)]
pub struct ChildConditions {
    children: Vec<Box<dyn Condition>>,
    treat_undetermined_as: ConditionEvaluateResult,
}

impl ChildConditions {
    /// Creates a child list.
    pub fn new(
        children: Vec<Box<dyn Condition>>,
        treat_undetermined_as: ConditionEvaluateResult,
    ) -> Self {
        Self {
            children,
            treat_undetermined_as,
        }
    }

    /// Builds every child of `config` once. Any asynchronous child is rejected.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        let children = config
            .children
            .iter()
            .map(|child| registry.create_sync(child, &config.condition_type))
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self::new(children, config.undetermined_policy()?))
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true when there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Lazily evaluates each child, applying the remap policy.
    pub fn results<'a>(
        &'a self,
        value_host_name: Option<&'a str>,
        values: &'a dyn ValueResolver,
    ) -> impl Iterator<Item = EvaluateResult<ConditionEvaluateResult>> + 'a {
        self.children.iter().map(move |child| {
            child
                .evaluate(value_host_name, values)
                .map(|r| r.or_treat_undetermined_as(self.treat_undetermined_as))
        })
    }

    /// Adds the field names every child reads.
    pub fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        for child in &self.children {
            child.gather_value_host_names(names);
        }
    }
}

// ============================================================================
// ALL
// ============================================================================

/// Matches when every child matches.
#[derive(Debug)]
pub struct All {
    condition_type: String,
    category: ConditionCategory,
    children: ChildConditions,
}

impl All {
    /// Creates an `All` over `children`.
    pub fn new(children: ChildConditions) -> Self {
        Self {
            condition_type: condition_types::ALL.to_owned(),
            category: ConditionCategory::Children,
            children,
        }
    }

    /// Builds from a config.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        Ok(Self {
            condition_type: config.condition_type.clone(),
            category: config.category_or(ConditionCategory::Children),
            children: ChildConditions::from_config(config, registry)?,
        })
    }

    /// The children.
    pub fn children(&self) -> &ChildConditions {
        &self.children
    }
}

impl Condition for All {
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
        if self.children.is_empty() {
            return Ok(ConditionEvaluateResult::Undetermined);
        }
        for result in self.children.results(value_host_name, values) {
            match result? {
                ConditionEvaluateResult::Match => {}
                other => return Ok(other),
            }
        }
        Ok(ConditionEvaluateResult::Match)
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.children.gather_value_host_names(names);
    }
}

// ============================================================================
// ANY
// ============================================================================

/// Matches when at least one child matches.
#[derive(Debug)]
pub struct Any {
    condition_type: String,
    category: ConditionCategory,
    children: ChildConditions,
}

impl Any {
    /// Creates an `Any` over `children`.
    pub fn new(children: ChildConditions) -> Self {
        Self {
            condition_type: condition_types::ANY.to_owned(),
            category: ConditionCategory::Children,
            children,
        }
    }

    /// Builds from a config.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        Ok(Self {
            condition_type: config.condition_type.clone(),
            category: config.category_or(ConditionCategory::Children),
            children: ChildConditions::from_config(config, registry)?,
        })
    }

    /// The children.
    pub fn children(&self) -> &ChildConditions {
        &self.children
    }
}

impl Condition for Any {
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
        if self.children.is_empty() {
            return Ok(ConditionEvaluateResult::Undetermined);
        }
        for result in self.children.results(value_host_name, values) {
            match result? {
                ConditionEvaluateResult::NoMatch => {}
                other => return Ok(other),
            }
        }
        Ok(ConditionEvaluateResult::NoMatch)
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.children.gather_value_host_names(names);
    }
}
