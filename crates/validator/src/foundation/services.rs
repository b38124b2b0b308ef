//! Services shared by every field of a configuration
//!
//! [`ValidationServices`] bundles the condition registry, the text localizer
//! and the engine-wide [`ValidationSettings`]. It is cheap to clone and is
//! passed explicitly; nothing here is global.

use crate::foundation::error::ConfigResult;
use crate::registry::ConditionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// LOCALIZATION
// ============================================================================

/// Resolves localization keys to display text.
pub trait TextLocalizer: Send + Sync + fmt::Debug {
    /// Returns the text for `key`, or `fallback` when the key is unknown.
    /// `None` means neither is available.
    fn get_message(&self, key: &str, fallback: Option<&str>) -> Option<String>;
}

/// Localizer with no translations: always answers the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackLocalizer;

impl TextLocalizer for FallbackLocalizer {
    fn get_message(&self, _key: &str, fallback: Option<&str>) -> Option<String> {
        fallback.map(str::to_owned)
    }
}

/// In-memory key/text table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapLocalizer {
    messages: HashMap<String, String>,
}

impl MapLocalizer {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a translation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Adds or replaces a translation.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.messages.insert(key.into(), text.into());
    }
}

impl TextLocalizer for MapLocalizer {
    fn get_message(&self, key: &str, fallback: Option<&str>) -> Option<String> {
        self.messages
            .get(key)
            .cloned()
            .or_else(|| fallback.map(str::to_owned))
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Engine-wide knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationSettings {
    /// Message used when a validator has none.
    pub default_error_message: String,
    /// Whether a Severe issue stops the remaining validators of the field.
    pub stop_on_severe: bool,
    /// Error code given to business-logic errors set without one.
    pub unmatched_business_logic_code: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            default_error_message: "Invalid value.".to_owned(),
            stop_on_severe: true,
            unmatched_business_logic_code: "BusinessLogic".to_owned(),
        }
    }
}

impl ValidationSettings {
    /// Parses settings from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// SERVICES
// ============================================================================

/// Registry, localizer and settings used while validating.
#[derive(Debug, Clone)]
pub struct ValidationServices {
    registry: Arc<ConditionRegistry>,
    localizer: Arc<dyn TextLocalizer>,
    settings: ValidationSettings,
}

impl ValidationServices {
    /// Built-in registry, no translations, default settings.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConditionRegistry::with_builtins()),
            localizer: Arc::new(FallbackLocalizer),
            settings: ValidationSettings::default(),
        }
    }

    /// Replaces the registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_registry(mut self, registry: ConditionRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Replaces the localizer.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_localizer(mut self, localizer: impl TextLocalizer + 'static) -> Self {
        self.localizer = Arc::new(localizer);
        self
    }

    /// Replaces the settings.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_settings(mut self, settings: ValidationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The condition registry.
    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    /// The settings.
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Resolves `key` through the localizer, falling back to `fallback`.
    /// Without a key the fallback is used as-is.
    pub fn localize(&self, key: Option<&str>, fallback: Option<&str>) -> Option<String> {
        match key.filter(|k| !k.is_empty()) {
            Some(key) => self.localizer.get_message(key, fallback),
            None => fallback.map(str::to_owned),
        }
    }
}

impl Default for ValidationServices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn localize_prefers_the_key() {
        let services = ValidationServices::new()
            .with_localizer(MapLocalizer::new().with("email.required", "Adresse requise"));
        assert_eq!(
            services.localize(Some("email.required"), Some("Email is required")),
            Some("Adresse requise".to_owned())
        );
        assert_eq!(
            services.localize(Some("unknown"), Some("Email is required")),
            Some("Email is required".to_owned())
        );
        assert_eq!(services.localize(None, None), None);
    }

    #[test]
    fn settings_fill_missing_keys_with_defaults() {
        let settings = ValidationSettings::from_json_str(r#"{ "stopOnSevere": false }"#).unwrap();
        assert!(!settings.stop_on_severe);
        assert_eq!(settings.default_error_message, "Invalid value.");
    }
}
