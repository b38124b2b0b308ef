//! Validator configuration and error-code resolution

use crate::config::condition::{ConditionConfig, condition_types};
use crate::foundation::{ConditionNode, ValidationSeverity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Builds a condition node directly, bypassing the registry.
///
/// Returning `None` installs a poisoned condition that logs and answers
/// `Undetermined`.
pub type ConditionCreator = Arc<dyn Fn(&ValidatorConfig) -> Option<ConditionNode> + Send + Sync>;

/// One validator of a field: a condition plus severity, error code and messages.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Condition evaluated by the validator. Exclusive with `condition_creator`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_config: Option<ConditionConfig>,

    /// Callback producing the condition. Exclusive with `condition_config`.
    #[serde(skip)]
    pub condition_creator: Option<ConditionCreator>,

    /// Explicit error code. See [`resolve_error_code`] for the fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Severity of a failure.
    #[serde(default)]
    pub severity: ValidationSeverity,

    /// Message shown next to the field; may contain `{Token}`s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Localization key of `error_message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message_l10n: Option<String>,

    /// Message shown in a summary; falls back to the error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_message: Option<String>,

    /// Localization key of `summary_message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_message_l10n: Option<String>,

    /// A disabled validator is always skipped.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// When set, the validator is skipped unless this condition matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabler: Option<ConditionConfig>,
}

fn enabled_by_default() -> bool {
    true
}

impl ValidatorConfig {
    /// Creates a validator over `condition`.
    pub fn new(condition: ConditionConfig) -> Self {
        Self {
            condition_config: Some(condition),
            condition_creator: None,
            error_code: None,
            severity: ValidationSeverity::default(),
            error_message: None,
            error_message_l10n: None,
            summary_message: None,
            summary_message_l10n: None,
            enabled: true,
            enabler: None,
        }
    }

    /// Creates a validator whose condition comes from `creator`.
    ///
    /// The error code is required here because there is no condition config to
    /// derive one from.
    pub fn with_creator<F>(error_code: impl Into<String>, creator: F) -> Self
    where
        F: Fn(&ValidatorConfig) -> Option<ConditionNode> + Send + Sync + 'static,
    {
        Self {
            condition_config: None,
            condition_creator: Some(Arc::new(creator)),
            error_code: Some(error_code.into()),
            ..Self::new(ConditionConfig::new(condition_types::UNKNOWN))
        }
    }

    /// Sets the error code.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// Sets the severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: ValidationSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the field-level error message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets the localization key of the error message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_message_l10n(mut self, key: impl Into<String>) -> Self {
        self.error_message_l10n = Some(key.into());
        self
    }

    /// Sets the summary message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_summary_message(mut self, message: impl Into<String>) -> Self {
        self.summary_message = Some(message.into());
        self
    }

    /// Sets the localization key of the summary message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_summary_message_l10n(mut self, key: impl Into<String>) -> Self {
        self.summary_message_l10n = Some(key.into());
        self
    }

    /// Sets the enabler condition.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_enabler(mut self, enabler: ConditionConfig) -> Self {
        self.enabler = Some(enabler);
        self
    }

    /// Enables or disables the validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Error code per [`resolve_error_code`].
    #[must_use]
    pub fn resolved_error_code(&self) -> String {
        resolve_error_code(self)
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("condition_config", &self.condition_config)
            .field("condition_creator", &self.condition_creator.is_some())
            .field("error_code", &self.error_code)
            .field("severity", &self.severity)
            .field("error_message", &self.error_message)
            .field("error_message_l10n", &self.error_message_l10n)
            .field("summary_message", &self.summary_message)
            .field("summary_message_l10n", &self.summary_message_l10n)
            .field("enabled", &self.enabled)
            .field("enabler", &self.enabler)
            .finish()
    }
}

impl PartialEq for ValidatorConfig {
    fn eq(&self, other: &Self) -> bool {
        let same_creator = match (&self.condition_creator, &other.condition_creator) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_creator
            && self.condition_config == other.condition_config
            && self.error_code == other.error_code
            && self.severity == other.severity
            && self.error_message == other.error_message
            && self.error_message_l10n == other.error_message_l10n
            && self.summary_message == other.summary_message
            && self.summary_message_l10n == other.summary_message_l10n
            && self.enabled == other.enabled
            && self.enabler == other.enabler
    }
}

// ============================================================================
// ERROR CODE RESOLUTION
// ============================================================================

/// Resolves the error code that correlates issues with this validator.
///
/// 1. The explicit `error_code`, when set and non-empty.
/// 2. For a `When` condition, the code of its child (`When` is never itself a
///    user-facing error).
/// 3. The condition's own type.
/// 4. `"Unknown"`.
#[must_use]
pub fn resolve_error_code(config: &ValidatorConfig) -> String {
    if let Some(code) = config.error_code.as_deref().filter(|c| !c.is_empty()) {
        return code.to_owned();
    }
    config
        .condition_config
        .as_ref()
        .map_or(condition_types::UNKNOWN, condition_error_code)
        .to_owned()
}

fn condition_error_code(condition: &ConditionConfig) -> &str {
    if condition.is_when() {
        return condition
            .child
            .as_deref()
            .map_or(condition_types::UNKNOWN, condition_error_code);
    }
    if condition.condition_type.is_empty() {
        condition_types::UNKNOWN
    } else {
        &condition.condition_type
    }
}
