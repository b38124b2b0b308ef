//! Condition registry
//!
//! Maps a condition type identifier to the factory that builds a
//! [`ConditionNode`] from a [`ConditionConfig`]. A registry is an ordinary
//! value carried by `ValidationServices`, so independent configurations in
//! one process never share factories by accident.

use crate::combinators;
use crate::conditions;
use crate::config::{ConditionConfig, condition_types};
use crate::foundation::{Condition, ConditionNode, ConfigError, ConfigResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds a node from its config. Receives the registry to build children.
pub type ConditionFactory =
    Arc<dyn Fn(&ConditionConfig, &ConditionRegistry) -> ConfigResult<ConditionNode> + Send + Sync>;

/// Registry of condition factories.
#[derive(Clone)]
pub struct ConditionRegistry {
    factories: HashMap<String, ConditionFactory>,
}

impl ConditionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry holding the combinators and the built-in leaf
    /// conditions, plus the `And`/`Or` aliases.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        combinators::register_all(&mut registry);
        conditions::register_all(&mut registry);
        for (alias, target) in [("And", condition_types::ALL), ("Or", condition_types::ANY)] {
            if let Some(factory) = registry.factories.get(target).cloned() {
                registry.factories.insert(alias.to_owned(), factory);
            }
        }
        registry
    }

    /// Registers (or replaces) the factory for `condition_type`.
    pub fn register<F>(&mut self, condition_type: impl Into<String>, factory: F)
    where
        F: Fn(&ConditionConfig, &ConditionRegistry) -> ConfigResult<ConditionNode>
            + Send
            + Sync
            + 'static,
    {
        let condition_type = condition_type.into();
        if self
            .factories
            .insert(condition_type.clone(), Arc::new(factory))
            .is_some()
        {
            debug!(condition_type = %condition_type, "replaced condition factory");
        }
    }

    /// Makes `alias` build nodes with the factory of `target`.
    pub fn register_alias(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> ConfigResult<()> {
        let alias = alias.into();
        let factory = self
            .factories
            .get(target)
            .cloned()
            .ok_or_else(|| ConfigError::AliasTargetMissing {
                alias: alias.clone(),
                target: target.to_owned(),
            })?;
        self.factories.insert(alias, factory);
        Ok(())
    }

    /// Returns true when a factory exists for `condition_type`.
    #[must_use]
    pub fn contains(&self, condition_type: &str) -> bool {
        self.factories.contains_key(condition_type)
    }

    /// Registered type identifiers, sorted.
    #[must_use]
    pub fn condition_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Builds a node from `config`.
    pub fn create(&self, config: &ConditionConfig) -> ConfigResult<ConditionNode> {
        let factory = self.factories.get(&config.condition_type).ok_or_else(|| {
            ConfigError::UnknownConditionType {
                condition_type: config.condition_type.clone(),
            }
        })?;
        factory(config, self)
    }

    /// Builds a node that must be synchronous, e.g. a combinator child.
    pub fn create_sync(
        &self,
        config: &ConditionConfig,
        owner: &str,
    ) -> ConfigResult<Box<dyn Condition>> {
        self.create(config)?.into_sync(owner)
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRegistry")
            .field("condition_types", &self.condition_types())
            .finish()
    }
}
