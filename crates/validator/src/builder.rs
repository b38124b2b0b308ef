//! Fluent configuration builder
//!
//! [`ValueHostsBuilder`] declares fields and their validators in code.
//! Declaring a field hands out a [`FieldBuilder`]; each rule method appends a
//! validator, and the modifier methods (`error_code`, `error_message`,
//! `severity`...) edit the most recently added one.
//!
//! A builder created with [`ValueHostsBuilder::with_base`] layers onto an
//! existing configuration instead: rule methods replace the validator with
//! the same error code, and [`FieldBuilder::combine_with`],
//! [`FieldBuilder::replace_condition_with`] and
//! [`FieldBuilder::delete_validator`] become available.
//!
//! Custom rules plug in through extension traits on [`FieldBuilder`]:
//!
//! ```rust,ignore
//! trait PostalCodeRules {
//!     fn postal_code(self) -> Self;
//! }
//!
//! impl PostalCodeRules for FieldBuilder {
//!     fn postal_code(self) -> Self {
//!         self.regexp(r"^\d{5}$").error_code("PostalCode")
//!     }
//! }
//! ```

use crate::config::{
    ConditionConfig, ValidatorConfig, ValueHostConfig, ValueHostKind, ValueHostsConfig,
};
use crate::foundation::{ConditionNode, ConfigError, ConfigResult, ValidationSeverity};
use crate::merge::{CombineUsing, ConfigModifier, MergeStrategy};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

// ============================================================================
// VALUE HOSTS BUILDER
// ============================================================================

/// Builds a [`ValueHostsConfig`].
#[derive(Debug, Clone)]
pub struct ValueHostsBuilder {
    modifier: ConfigModifier,
    declared: IndexMap<String, ValueHostKind>,
    layered: bool,
    deferred: Option<ConfigError>,
}

impl ValueHostsBuilder {
    /// Starts an empty configuration.
    pub fn new() -> Self {
        Self::from_modifier(ConfigModifier::new(Arc::default()), false)
    }

    /// Layers changes onto an existing configuration. `base` is never mutated.
    pub fn with_base(base: Arc<ValueHostsConfig>) -> Self {
        Self::from_modifier(ConfigModifier::new(base), true)
    }

    fn from_modifier(modifier: ConfigModifier, layered: bool) -> Self {
        Self {
            modifier,
            declared: IndexMap::new(),
            layered,
            deferred: None,
        }
    }

    /// Declares an input field.
    pub fn input(self, name: impl Into<String>) -> ConfigResult<FieldBuilder> {
        self.declare(name.into(), ValueHostKind::Input)
    }

    /// Declares a property field.
    pub fn property(self, name: impl Into<String>) -> ConfigResult<FieldBuilder> {
        self.declare(name.into(), ValueHostKind::Property)
    }

    fn declare(mut self, name: String, kind: ValueHostKind) -> ConfigResult<FieldBuilder> {
        if let Some(existing) = self.declared.get(&name) {
            return Err(ConfigError::NamingConflict {
                name,
                existing: existing.to_string(),
            });
        }
        match self.modifier.get(&name) {
            Some(current) if current.kind != kind => {
                return Err(ConfigError::NamingConflict {
                    name,
                    existing: current.kind.to_string(),
                });
            }
            Some(_) => {}
            None => self.modifier.merge_value_host(
                ValueHostConfig::new(name.clone(), kind),
                MergeStrategy::Replace,
            )?,
        }
        self.declared.insert(name.clone(), kind);
        Ok(FieldBuilder {
            builder: self,
            name,
            last: None,
        })
    }

    /// Names declared through this builder, in order.
    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.declared.keys().map(String::as_str)
    }

    /// Finishes the configuration. Reports the first error deferred by a
    /// rule method, then checks the assembled result.
    pub fn build(self) -> ConfigResult<ValueHostsConfig> {
        if let Some(error) = self.deferred {
            return Err(error);
        }
        self.modifier.apply()
    }
}

impl Default for ValueHostsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// FIELD BUILDER
// ============================================================================

/// Adds validators to one field. Obtained from [`ValueHostsBuilder::input`]
/// or [`ValueHostsBuilder::property`].
#[derive(Debug, Clone)]
#[must_use = "builder methods must be chained or built"]
pub struct FieldBuilder {
    builder: ValueHostsBuilder,
    name: String,
    last: Option<usize>,
}

impl FieldBuilder {
    /// Name of the field being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns to the configuration builder.
    pub fn done(self) -> ValueHostsBuilder {
        self.builder
    }

    /// Finishes this field and declares the next input field.
    pub fn input(self, name: impl Into<String>) -> ConfigResult<FieldBuilder> {
        self.builder.input(name)
    }

    /// Finishes this field and declares the next property field.
    pub fn property(self, name: impl Into<String>) -> ConfigResult<FieldBuilder> {
        self.builder.property(name)
    }

    /// Finishes the whole configuration.
    pub fn build(self) -> ConfigResult<ValueHostsConfig> {
        self.builder.build()
    }

    fn value_host(&mut self) -> ConfigResult<&mut ValueHostConfig> {
        self.builder.modifier.value_host_mut(&self.name)
    }

    fn defer(&mut self, error: ConfigError) {
        self.builder.deferred.get_or_insert(error);
    }

    // ------------------------------------------------------------------
    // Field settings
    // ------------------------------------------------------------------

    /// Sets the label used for `{Label}`.
    pub fn label(self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.edit_field(|field| field.label = Some(label))
    }

    /// Sets the localization key of the label.
    pub fn label_l10n(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.edit_field(|field| field.label_l10n = Some(key))
    }

    /// Sets the data type identifier.
    pub fn data_type(self, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        self.edit_field(|field| field.data_type = Some(data_type))
    }

    fn edit_field(mut self, edit: impl FnOnce(&mut ValueHostConfig)) -> Self {
        match self.value_host() {
            Ok(field) => edit(field),
            Err(error) => self.defer(error),
        }
        self
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Adds a validator. In a layered builder it replaces the validator with
    /// the same error code, inheriting the parts it leaves unset.
    pub fn validator(mut self, validator: ValidatorConfig) -> Self {
        let layered = self.builder.layered;
        let added = self.value_host().and_then(|field| {
            if layered {
                crate::merge::merge_validator(field, validator, MergeStrategy::Replace)
            } else {
                field.validator_configs.push(validator);
                Ok(Some(field.validator_configs.len() - 1))
            }
        });
        match added {
            Ok(index) => self.last = index,
            Err(error) => {
                self.last = None;
                self.defer(error);
            }
        }
        self
    }

    /// Adds a validator for `condition`.
    pub fn condition(self, condition: ConditionConfig) -> Self {
        self.validator(ValidatorConfig::new(condition))
    }

    /// Adds a validator whose condition is produced by `creator`.
    pub fn condition_creator<F>(self, error_code: impl Into<String>, creator: F) -> Self
    where
        F: Fn(&ValidatorConfig) -> Option<ConditionNode> + Send + Sync + 'static,
    {
        self.validator(ValidatorConfig::with_creator(error_code, creator))
    }

    /// Requires non-empty text.
    pub fn require_text(self) -> Self {
        self.condition(ConditionConfig::require_text())
    }

    /// Requires a value of `data_type`.
    pub fn data_type_check(self, data_type: impl Into<String>) -> Self {
        self.condition(ConditionConfig::data_type_check(data_type))
    }

    /// Requires the value to equal `second_value`.
    pub fn equal_to_value(self, second_value: impl Into<Value>) -> Self {
        self.condition(ConditionConfig::equal_to_value(second_value))
    }

    /// Requires the value to match `expression`.
    pub fn regexp(self, expression: impl Into<String>) -> Self {
        self.condition(ConditionConfig::regexp(expression))
    }

    /// Requires every child to match.
    pub fn all(self, children: Vec<ConditionConfig>) -> Self {
        self.condition(ConditionConfig::all(children))
    }

    /// Requires at least one child to match.
    pub fn any(self, children: Vec<ConditionConfig>) -> Self {
        self.condition(ConditionConfig::any(children))
    }

    /// Requires `child` not to match.
    pub fn not(self, child: ConditionConfig) -> Self {
        self.condition(ConditionConfig::not(child))
    }

    /// Requires between `minimum` and `maximum` children to match.
    pub fn count_matches(
        self,
        minimum: Option<u32>,
        maximum: Option<u32>,
        children: Vec<ConditionConfig>,
    ) -> Self {
        self.condition(ConditionConfig::count_matches(minimum, maximum, children))
    }

    /// Applies `child` only while `enabler` matches.
    pub fn when(self, enabler: ConditionConfig, child: ConditionConfig) -> Self {
        self.condition(ConditionConfig::when(enabler, child))
    }

    // ------------------------------------------------------------------
    // Modifiers of the last validator
    // ------------------------------------------------------------------

    fn edit_last(mut self, method: &'static str, edit: impl FnOnce(&mut ValidatorConfig)) -> Self {
        let Some(index) = self.last else {
            warn!(value_host = %self.name, method, "no validator to modify; call ignored");
            return self;
        };
        match self.builder.modifier.value_host_mut(&self.name) {
            Ok(field) => match field.validator_configs.get_mut(index) {
                Some(validator) => edit(validator),
                None => warn!(
                    value_host = %self.name,
                    method,
                    "validator no longer present; call ignored"
                ),
            },
            Err(error) => self.defer(error),
        }
        self
    }

    /// Overrides the error code of the last validator.
    pub fn error_code(self, error_code: impl Into<String>) -> Self {
        let error_code = error_code.into();
        self.edit_last("error_code", |v| v.error_code = Some(error_code))
    }

    /// Sets the error message template of the last validator.
    pub fn error_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.edit_last("error_message", |v| v.error_message = Some(message))
    }

    /// Sets the error message localization key of the last validator.
    pub fn error_message_l10n(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.edit_last("error_message_l10n", |v| v.error_message_l10n = Some(key))
    }

    /// Sets the summary message template of the last validator.
    pub fn summary_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.edit_last("summary_message", |v| v.summary_message = Some(message))
    }

    /// Sets the summary message localization key of the last validator.
    pub fn summary_message_l10n(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.edit_last("summary_message_l10n", |v| v.summary_message_l10n = Some(key))
    }

    /// Sets the severity of the last validator.
    pub fn severity(self, severity: ValidationSeverity) -> Self {
        self.edit_last("severity", |v| v.severity = severity)
    }

    /// Gates the last validator on `enabler`.
    pub fn enabler(self, enabler: ConditionConfig) -> Self {
        self.edit_last("enabler", |v| v.enabler = Some(enabler))
    }

    /// Enables or disables the last validator.
    pub fn enabled(self, enabled: bool) -> Self {
        self.edit_last("enabled", |v| v.enabled = enabled)
    }

    // ------------------------------------------------------------------
    // Layered edits
    // ------------------------------------------------------------------

    /// Combines `validator` with the existing validator of the same error
    /// code. The combined validator becomes the last validator.
    pub fn combine_with(
        mut self,
        validator: ValidatorConfig,
        using: CombineUsing,
    ) -> ConfigResult<Self> {
        self.last = self
            .builder
            .modifier
            .combine_with(&self.name, validator, using)?;
        Ok(self)
    }

    /// Rewrites the condition of the validator `error_code`.
    pub fn replace_condition_with<F>(mut self, error_code: &str, replace: F) -> ConfigResult<Self>
    where
        F: FnOnce(&ConditionConfig) -> Option<ConditionConfig>,
    {
        self.builder
            .modifier
            .replace_condition_with(&self.name, error_code, replace)?;
        self.last = self.value_host()?.validator_index(error_code);
        Ok(self)
    }

    /// Removes the validator `error_code`.
    pub fn delete_validator(mut self, error_code: &str) -> ConfigResult<Self> {
        self.builder
            .modifier
            .delete_validator(&self.name, error_code)?;
        self.last = None;
        Ok(self)
    }
}
