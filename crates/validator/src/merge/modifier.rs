//! Copy-on-write configuration modifier
//!
//! A [`ConfigModifier`] collects changes against a published
//! [`ValueHostsConfig`] without touching it. The first change to a field
//! clones that field from the base into an override layer; later changes
//! mutate the clone. Removed fields are only marked. [`ConfigModifier::apply`]
//! assembles a new configuration from the base and the overrides.

use super::engine::{self, CombineUsing, MergeStrategy};
use crate::config::{ConditionConfig, ValidatorConfig, ValueHostConfig, ValueHostsConfig};
use crate::foundation::{ConfigError, ConfigResult};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use tracing::debug;

/// Pending changes against a base configuration.
#[derive(Debug, Clone)]
pub struct ConfigModifier {
    base: Arc<ValueHostsConfig>,
    overrides: IndexMap<String, ValueHostConfig>,
    removed: IndexSet<String>,
}

impl ConfigModifier {
    /// Starts modifying `base`.
    pub fn new(base: Arc<ValueHostsConfig>) -> Self {
        Self {
            base,
            overrides: IndexMap::new(),
            removed: IndexSet::new(),
        }
    }

    /// The untouched base.
    pub fn base(&self) -> &Arc<ValueHostsConfig> {
        &self.base
    }

    /// Returns true when `name` has been cloned into the override layer.
    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }

    /// Current view of a field: the override if touched, else the base.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ValueHostConfig> {
        if self.removed.contains(name) {
            return None;
        }
        self.overrides.get(name).or_else(|| self.base.get(name))
    }

    /// Mutable access to a field, cloning it from the base on first touch.
    pub fn value_host_mut(&mut self, name: &str) -> ConfigResult<&mut ValueHostConfig> {
        if self.removed.contains(name) {
            return Err(ConfigError::UnknownValueHost {
                name: name.to_owned(),
            });
        }
        if !self.overrides.contains_key(name) {
            let original = self
                .base
                .get(name)
                .ok_or_else(|| ConfigError::UnknownValueHost {
                    name: name.to_owned(),
                })?;
            debug!(value_host = %name, "cloning value host into override layer");
            self.overrides.insert(name.to_owned(), original.clone());
        }
        self.overrides
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownValueHost {
                name: name.to_owned(),
            })
    }

    /// Adds a new field, or merges into an existing one with `strategy`.
    pub fn merge_value_host(
        &mut self,
        value_host: ValueHostConfig,
        strategy: MergeStrategy,
    ) -> ConfigResult<()> {
        if self.get(&value_host.name).is_none() {
            self.removed.shift_remove(&value_host.name);
            self.overrides.insert(value_host.name.clone(), value_host);
            return Ok(());
        }
        let target = self.value_host_mut(&value_host.name)?;
        engine::merge_value_host(target, value_host, strategy)
    }

    /// Merges one validator into a field. See [`engine::merge_validator`].
    pub fn merge_validator(
        &mut self,
        value_host: &str,
        validator: ValidatorConfig,
        strategy: MergeStrategy,
    ) -> ConfigResult<Option<usize>> {
        engine::merge_validator(self.value_host_mut(value_host)?, validator, strategy)
    }

    /// Combines `validator` with the existing one of the same error code.
    pub fn combine_with(
        &mut self,
        value_host: &str,
        validator: ValidatorConfig,
        using: CombineUsing,
    ) -> ConfigResult<Option<usize>> {
        self.merge_validator(value_host, validator, MergeStrategy::Combine(using))
    }

    /// Rewrites a validator's condition. See [`engine::replace_condition_with`].
    pub fn replace_condition_with<F>(
        &mut self,
        value_host: &str,
        error_code: &str,
        replace: F,
    ) -> ConfigResult<()>
    where
        F: FnOnce(&ConditionConfig) -> Option<ConditionConfig>,
    {
        engine::replace_condition_with(self.value_host_mut(value_host)?, error_code, replace)
    }

    /// Edits a validator in place.
    pub fn update_validator<F>(
        &mut self,
        value_host: &str,
        error_code: &str,
        update: F,
    ) -> ConfigResult<()>
    where
        F: FnOnce(&mut ValidatorConfig),
    {
        let target = self.value_host_mut(value_host)?;
        let index = target
            .validator_index(error_code)
            .ok_or_else(|| ConfigError::UnknownValidator {
                value_host: value_host.to_owned(),
                error_code: error_code.to_owned(),
            })?;
        update(&mut target.validator_configs[index]);
        Ok(())
    }

    /// Removes a validator.
    pub fn delete_validator(&mut self, value_host: &str, error_code: &str) -> ConfigResult<()> {
        let target = self.value_host_mut(value_host)?;
        let index = target
            .validator_index(error_code)
            .ok_or_else(|| ConfigError::UnknownValidator {
                value_host: value_host.to_owned(),
                error_code: error_code.to_owned(),
            })?;
        target.validator_configs.remove(index);
        Ok(())
    }

    /// Removes a field. Adding it again with [`Self::merge_value_host`]
    /// starts from the new config alone.
    pub fn remove_value_host(&mut self, name: &str) -> ConfigResult<()> {
        if self.get(name).is_none() {
            return Err(ConfigError::UnknownValueHost {
                name: name.to_owned(),
            });
        }
        self.overrides.shift_remove(name);
        if self.base.get(name).is_some() {
            self.removed.insert(name.to_owned());
        }
        debug!(value_host = %name, "removing value host");
        Ok(())
    }

    /// Builds the modified configuration: base fields in order with their
    /// overrides, then new fields in the order they were added. The result is
    /// checked with [`ValueHostsConfig::validate`].
    pub fn apply(self) -> ConfigResult<ValueHostsConfig> {
        let Self {
            base,
            mut overrides,
            removed,
        } = self;
        let mut value_hosts = Vec::with_capacity(base.value_hosts.len() + overrides.len());
        for original in &base.value_hosts {
            if removed.contains(&original.name) {
                continue;
            }
            match overrides.shift_remove(&original.name) {
                Some(modified) => value_hosts.push(modified),
                None => value_hosts.push(original.clone()),
            }
        }
        value_hosts.extend(overrides.into_values());
        let config = ValueHostsConfig::new(value_hosts);
        config.validate()?;
        Ok(config)
    }
}
