//! Field (value host) configuration

use crate::config::validator::ValidatorConfig;
use crate::foundation::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What kind of field a value host represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueHostKind {
    /// An editor the user types into.
    #[default]
    Input,
    /// A property of a business object, validated without an editor.
    Property,
}

impl fmt::Display for ValueHostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Property => "property",
        })
    }
}

/// Configuration of one named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHostConfig {
    /// Unique name within the configuration set.
    pub name: String,

    /// Input or property.
    #[serde(default)]
    pub kind: ValueHostKind,

    /// Data type identifier, e.g. `String`, `Integer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Label used for `{Label}` in messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Localization key of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_l10n: Option<String>,

    /// Validators in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validator_configs: Vec<ValidatorConfig>,
}

impl ValueHostConfig {
    /// Creates an input field.
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, ValueHostKind::Input)
    }

    /// Creates a property field.
    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, ValueHostKind::Property)
    }

    /// Creates a field of the given kind.
    pub fn new(name: impl Into<String>, kind: ValueHostKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data_type: None,
            label: None,
            label_l10n: None,
            validator_configs: Vec::new(),
        }
    }

    /// Sets the data type.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Sets the label.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator_configs.push(validator);
        self
    }

    /// Position of the validator whose resolved error code is `error_code`.
    #[must_use]
    pub fn validator_index(&self, error_code: &str) -> Option<usize> {
        self.validator_configs
            .iter()
            .position(|v| v.resolved_error_code() == error_code)
    }

    /// Validator whose resolved error code is `error_code`.
    #[must_use]
    pub fn validator(&self, error_code: &str) -> Option<&ValidatorConfig> {
        self.validator_index(error_code)
            .map(|i| &self.validator_configs[i])
    }

    /// Checks the field on its own: error codes unique, each validator with
    /// exactly one condition source.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut codes = HashSet::new();
        for validator in &self.validator_configs {
            let error_code = validator.resolved_error_code();
            match (&validator.condition_config, &validator.condition_creator) {
                (None, None) => {
                    return Err(ConfigError::MissingCondition {
                        value_host: self.name.clone(),
                        error_code,
                    });
                }
                (Some(_), Some(_)) => {
                    return Err(ConfigError::ConflictingConditionSources {
                        value_host: self.name.clone(),
                        error_code,
                    });
                }
                _ => {}
            }
            if !codes.insert(error_code.clone()) {
                return Err(ConfigError::DuplicateErrorCode {
                    value_host: self.name.clone(),
                    error_code,
                });
            }
        }
        Ok(())
    }
}

/// A full configuration set: every field of a form or business object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHostsConfig {
    /// Fields in declaration order.
    #[serde(default)]
    pub value_hosts: Vec<ValueHostConfig>,
}

impl ValueHostsConfig {
    /// Creates a set from fields.
    pub fn new(value_hosts: Vec<ValueHostConfig>) -> Self {
        Self { value_hosts }
    }

    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ValueHostConfig> {
        self.value_hosts.iter().find(|vh| vh.name == name)
    }

    /// Mutable field by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ValueHostConfig> {
        self.value_hosts.iter_mut().find(|vh| vh.name == name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.value_hosts.iter().map(|vh| vh.name.as_str())
    }

    /// Checks the whole set: unique names, and each field on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        for value_host in &self.value_hosts {
            if !names.insert(value_host.name.as_str()) {
                return Err(ConfigError::DuplicateValueHost {
                    name: value_host.name.clone(),
                });
            }
            value_host.validate()?;
        }
        Ok(())
    }
}
