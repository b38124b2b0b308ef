//! Validation manager
//!
//! The multi-field surface of the engine. A [`ValidationManager`] owns the
//! published configuration, the services, the current field values and one
//! [`ValueHost`] per field.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formgate_validator::prelude::*;
//!
//! let config = ValueHostsBuilder::new()
//!     .input("email")?.require_text().regexp(".+@.+").done()
//!     .build()?;
//! let mut manager = ValidationManager::new(config, ValidationServices::new())?;
//! manager.set_value("email", "ada@example.com")?;
//! let result = manager.validate("email", ValidateOptions::default())?;
//! assert!(result.state.is_valid());
//! ```

use crate::config::ValueHostsConfig;
use crate::foundation::{
    ConfigError, ConfigResult, ValidationServices, ValidationStatus, ValueHostValidationState,
};
use crate::merge::ConfigModifier;
use crate::validation::{
    BusinessLogicError, PendingValidation, StateChangedHandler, ValidateOptions, Validator,
    ValueHost, ValueHostValidateResult,
};
use futures::future::join_all;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of [`ValidationManager::validate_all`].
#[derive(Debug)]
pub struct ValidateAllResult {
    /// State of every field after its synchronous validators, in declaration order.
    pub states: Vec<ValueHostValidationState>,
    /// Asynchronous validators still running, across all fields.
    pub pending: Vec<PendingValidation>,
}

impl ValidateAllResult {
    /// Returns true when no field is invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.states
            .iter()
            .all(|s| s.status != ValidationStatus::Invalid)
    }

    /// Drives every pending validation. Returns the states they produced;
    /// stale results are left out.
    pub async fn settle(self) -> Vec<ValueHostValidationState> {
        join_all(self.pending).await.into_iter().flatten().collect()
    }
}

/// Validates a set of fields against their configuration.
pub struct ValidationManager {
    config: Arc<ValueHostsConfig>,
    services: ValidationServices,
    values: HashMap<String, Value>,
    value_hosts: IndexMap<String, ValueHost>,
    handler: Option<StateChangedHandler>,
}

impl ValidationManager {
    /// Creates a manager. The configuration is checked first.
    pub fn new(config: ValueHostsConfig, services: ValidationServices) -> ConfigResult<Self> {
        config.validate()?;
        let mut value_hosts = IndexMap::with_capacity(config.value_hosts.len());
        for value_host in &config.value_hosts {
            value_hosts.insert(
                value_host.name.clone(),
                ValueHost::new(value_host.clone(), &services)?,
            );
        }
        info!(value_hosts = value_hosts.len(), "validation manager created");
        Ok(Self {
            config: Arc::new(config),
            services,
            values: HashMap::new(),
            value_hosts,
            handler: None,
        })
    }

    /// Creates a manager from a JSON configuration document.
    pub fn from_json_str(json: &str, services: ValidationServices) -> ConfigResult<Self> {
        Self::new(ValueHostsConfig::from_json_str(json)?, services)
    }

    /// The published configuration.
    pub fn config(&self) -> &Arc<ValueHostsConfig> {
        &self.config
    }

    /// The services.
    pub fn services(&self) -> &ValidationServices {
        &self.services
    }

    /// A field.
    pub fn value_host(&self, name: &str) -> ConfigResult<&ValueHost> {
        self.value_hosts
            .get(name)
            .ok_or_else(|| unknown_value_host(name))
    }

    fn value_host_mut(&mut self, name: &str) -> ConfigResult<&mut ValueHost> {
        self.value_hosts
            .get_mut(name)
            .ok_or_else(|| unknown_value_host(name))
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Stores the value of a field. Does not validate.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> ConfigResult<()> {
        self.value_host(name)?;
        self.values.insert(name.to_owned(), value.into());
        Ok(())
    }

    /// Current value of a field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// All current values.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validates one field.
    pub fn validate(
        &mut self,
        name: &str,
        options: ValidateOptions,
    ) -> ConfigResult<ValueHostValidateResult> {
        let value_host = self
            .value_hosts
            .get_mut(name)
            .ok_or_else(|| unknown_value_host(name))?;
        value_host.validate(&self.values, &self.services, options)
    }

    /// Validates one field and waits for its asynchronous validators.
    pub async fn validate_and_settle(
        &mut self,
        name: &str,
        options: ValidateOptions,
    ) -> ConfigResult<ValueHostValidationState> {
        let result = self.validate(name, options)?;
        join_all(result.pending).await;
        self.validation_state(name)
    }

    /// Validates every field in declaration order.
    pub fn validate_all(&mut self, options: ValidateOptions) -> ConfigResult<ValidateAllResult> {
        let mut states = Vec::with_capacity(self.value_hosts.len());
        let mut pending = Vec::new();
        for value_host in self.value_hosts.values_mut() {
            let result = value_host.validate(&self.values, &self.services, options)?;
            states.push(result.state);
            pending.extend(result.pending);
        }
        debug!(
            value_hosts = states.len(),
            pending = pending.len(),
            "validated all value hosts"
        );
        Ok(ValidateAllResult { states, pending })
    }

    /// Current state of a field.
    pub fn validation_state(&self, name: &str) -> ConfigResult<ValueHostValidationState> {
        Ok(self.value_host(name)?.validation_state())
    }

    /// Validator of a field by resolved error code.
    pub fn get_validator(&self, name: &str, error_code: &str) -> ConfigResult<&Validator> {
        self.value_host(name)?
            .validator(error_code)
            .ok_or_else(|| ConfigError::UnknownValidator {
                value_host: name.to_owned(),
                error_code: error_code.to_owned(),
            })
    }

    /// Fields whose conditions read `name`, in declaration order.
    pub fn dependents_of(&mut self, name: &str) -> ConfigResult<Vec<String>> {
        self.value_host(name)?;
        let mut dependents = Vec::new();
        for (other, value_host) in &mut self.value_hosts {
            if other == name {
                continue;
            }
            if value_host
                .referenced_value_hosts(&self.services)?
                .contains(name)
            {
                dependents.push(other.clone());
            }
        }
        Ok(dependents)
    }

    // ------------------------------------------------------------------
    // Business logic
    // ------------------------------------------------------------------

    /// Reports a business-logic error on a field.
    pub fn set_business_logic_error(
        &self,
        name: &str,
        error: BusinessLogicError,
    ) -> ConfigResult<ValueHostValidationState> {
        Ok(self.value_host(name)?.set_business_logic_error(error))
    }

    /// Removes every business-logic error of a field.
    pub fn clear_business_logic_errors(
        &self,
        name: &str,
    ) -> ConfigResult<ValueHostValidationState> {
        Ok(self.value_host(name)?.clear_business_logic_errors())
    }

    /// Installs the handler called when any field's state changes.
    pub fn on_validation_state_changed<F>(&mut self, handler: F)
    where
        F: Fn(&ValueHostValidationState) + Send + Sync + 'static,
    {
        let handler: StateChangedHandler = Arc::new(handler);
        for value_host in self.value_hosts.values() {
            value_host.set_state_changed_handler(Some(Arc::clone(&handler)));
        }
        self.handler = Some(handler);
    }

    // ------------------------------------------------------------------
    // Reconfiguration
    // ------------------------------------------------------------------

    /// Starts a set of changes against the published configuration.
    pub fn start_modifying(&self) -> ConfigModifier {
        ConfigModifier::new(Arc::clone(&self.config))
    }

    /// Publishes the modified configuration. Fields whose configuration
    /// changed are rebuilt and lose their state; the others are kept.
    /// Values of removed fields are dropped.
    pub fn apply_modifications(&mut self, modifier: ConfigModifier) -> ConfigResult<()> {
        let config = modifier.apply()?;

        let mut rebuilt = HashMap::new();
        for value_host in &config.value_hosts {
            let unchanged = self
                .value_hosts
                .get(&value_host.name)
                .is_some_and(|existing| existing.config() == value_host);
            if !unchanged {
                let fresh = ValueHost::new(value_host.clone(), &self.services)?;
                fresh.set_state_changed_handler(self.handler.clone());
                rebuilt.insert(value_host.name.clone(), fresh);
            }
        }

        let mut previous = std::mem::take(&mut self.value_hosts);
        for value_host in &config.value_hosts {
            let host = rebuilt
                .remove(&value_host.name)
                .or_else(|| previous.shift_remove(&value_host.name));
            if let Some(host) = host {
                self.value_hosts.insert(value_host.name.clone(), host);
            }
        }
        self.values.retain(|name, _| self.value_hosts.contains_key(name));
        info!(
            value_hosts = self.value_hosts.len(),
            removed = previous.len(),
            "configuration modifications applied"
        );
        self.config = Arc::new(config);
        Ok(())
    }
}

fn unknown_value_host(name: &str) -> ConfigError {
    ConfigError::UnknownValueHost {
        name: name.to_owned(),
    }
}

impl std::fmt::Debug for ValidationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationManager")
            .field("value_hosts", &self.value_hosts.keys().collect::<Vec<_>>())
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
