//! Config merge engine
//!
//! Merges an incoming configuration fragment into an existing one. Fields
//! are matched by name and validators by resolved error code.
//!
//! | Strategy              | Matched validator                                 | Unmatched  |
//! |-----------------------|---------------------------------------------------|------------|
//! | `Replace`             | newer takes the slot; unset parts are inherited   | appended   |
//! | `Combine(All \| Any)` | `All`/`Any` of old and new, old first             | appended   |
//! | `Combine(When)`       | `When(enabler: new, child: old)`                  | appended   |
//! | `Delete`              | removed                                           | ignored    |
//! | `NoChange`            | kept as is                                        | ignored    |
//!
//! Every function here mutates the target it is given. Callers that must not
//! touch a published configuration go through
//! [`ConfigModifier`](super::ConfigModifier), which clones first.

use crate::config::{ConditionConfig, ValidatorConfig, ValueHostConfig, ValueHostsConfig};
use crate::foundation::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Combinator wrapping the old and new conditions of a combined validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombineUsing {
    /// Both must match.
    All,
    /// Either may match.
    Any,
    /// The new condition enables the old one.
    When,
}

/// How an incoming validator treats an existing one with the same error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Newer replaces older in place.
    #[default]
    Replace,
    /// Old and new conditions are combined.
    Combine(CombineUsing),
    /// The existing validator is removed.
    Delete,
    /// The existing validator is kept untouched.
    NoChange,
}

// ============================================================================
// FIELD LEVEL
// ============================================================================

/// Merges every field of `source` into `target`: unknown names are
/// appended, known ones merged with [`merge_value_host`].
pub fn merge_value_hosts(
    target: &mut ValueHostsConfig,
    source: ValueHostsConfig,
    strategy: MergeStrategy,
) -> ConfigResult<()> {
    for value_host in source.value_hosts {
        match target.get_mut(&value_host.name) {
            Some(existing) => merge_value_host(existing, value_host, strategy)?,
            None => {
                debug!(value_host = %value_host.name, "appending value host");
                target.value_hosts.push(value_host);
            }
        }
    }
    Ok(())
}

/// Merges `source` into `target`, a field of the same name.
///
/// `label`, `label_l10n` and `data_type` take the newer value when it is set.
/// The name and the kind are locked; a different kind is logged and ignored.
/// Validators are merged one by one with `strategy`.
pub fn merge_value_host(
    target: &mut ValueHostConfig,
    source: ValueHostConfig,
    strategy: MergeStrategy,
) -> ConfigResult<()> {
    if target.name != source.name {
        return Err(ConfigError::UnknownValueHost { name: source.name });
    }
    if target.kind != source.kind {
        warn!(
            value_host = %target.name,
            existing = %target.kind,
            incoming = %source.kind,
            "value host kind cannot change on merge; keeping the existing kind"
        );
    }
    if source.label.is_some() {
        target.label = source.label;
    }
    if source.label_l10n.is_some() {
        target.label_l10n = source.label_l10n;
    }
    if source.data_type.is_some() {
        target.data_type = source.data_type;
    }
    for validator in source.validator_configs {
        merge_validator(target, validator, strategy)?;
    }
    Ok(())
}

// ============================================================================
// VALIDATOR LEVEL
// ============================================================================

/// Merges one validator into `target` with `strategy`.
///
/// Returns the index of the validator that now carries the incoming one, or
/// `None` when nothing was kept (`Delete`, or `NoChange` without a match).
pub fn merge_validator(
    target: &mut ValueHostConfig,
    source: ValidatorConfig,
    strategy: MergeStrategy,
) -> ConfigResult<Option<usize>> {
    let error_code = source.resolved_error_code();
    let Some(index) = target.validator_index(&error_code) else {
        return Ok(match strategy {
            MergeStrategy::Delete | MergeStrategy::NoChange => {
                debug!(
                    value_host = %target.name,
                    error_code = %error_code,
                    ?strategy,
                    "no validator to merge with"
                );
                None
            }
            MergeStrategy::Replace | MergeStrategy::Combine(_) => {
                target.validator_configs.push(source);
                Some(target.validator_configs.len() - 1)
            }
        });
    };

    match strategy {
        MergeStrategy::NoChange => Ok(Some(index)),
        MergeStrategy::Delete => {
            target.validator_configs.remove(index);
            debug!(value_host = %target.name, error_code = %error_code, "validator deleted");
            Ok(None)
        }
        MergeStrategy::Replace => {
            let old = &target.validator_configs[index];
            let merged = inherit(source, old);
            target.validator_configs[index] = merged;
            Ok(Some(index))
        }
        MergeStrategy::Combine(using) => {
            let value_host = target.name.clone();
            let old = &mut target.validator_configs[index];
            let not_mergeable = || ConfigError::NotMergeable {
                value_host: value_host.clone(),
                error_code: error_code.clone(),
            };
            let old_condition = old.condition_config.clone().ok_or_else(not_mergeable)?;
            let new_condition = source.condition_config.clone().ok_or_else(not_mergeable)?;
            let old_code = old.resolved_error_code();
            old.condition_config = Some(match using {
                CombineUsing::All => ConditionConfig::all(vec![old_condition, new_condition]),
                CombineUsing::Any => ConditionConfig::any(vec![old_condition, new_condition]),
                CombineUsing::When => ConditionConfig::when(new_condition, old_condition),
            });
            old.error_code = Some(old_code);
            override_messages(old, source);
            Ok(Some(index))
        }
    }
}

/// Rewrites the condition of the validator `error_code` with `replace`.
///
/// `replace` receives the current condition. Returning `None` leaves the
/// validator untouched and is logged. The validator keeps its resolved
/// error code even when the new condition has a different type.
pub fn replace_condition_with<F>(
    target: &mut ValueHostConfig,
    error_code: &str,
    replace: F,
) -> ConfigResult<()>
where
    F: FnOnce(&ConditionConfig) -> Option<ConditionConfig>,
{
    let index = target
        .validator_index(error_code)
        .ok_or_else(|| ConfigError::UnknownValidator {
            value_host: target.name.clone(),
            error_code: error_code.to_owned(),
        })?;
    let value_host = target.name.clone();
    let validator = &mut target.validator_configs[index];
    let current = validator
        .condition_config
        .as_ref()
        .ok_or_else(|| ConfigError::NotMergeable {
            value_host: value_host.clone(),
            error_code: error_code.to_owned(),
        })?;
    match replace(current) {
        Some(condition) => {
            validator.error_code = Some(validator.resolved_error_code());
            validator.condition_config = Some(condition);
        }
        None => warn!(
            value_host = %value_host,
            error_code = %error_code,
            "replacement callback returned no condition; keeping the original"
        ),
    }
    Ok(())
}

/// Newer validator with its unset parts taken from `old`.
fn inherit(mut source: ValidatorConfig, old: &ValidatorConfig) -> ValidatorConfig {
    if source.condition_config.is_none() && source.condition_creator.is_none() {
        source.condition_config = old.condition_config.clone();
        source.condition_creator = old.condition_creator.clone();
    }
    if source.error_code.is_none() {
        source.error_code = old.error_code.clone();
    }
    fill(&mut source.error_message, &old.error_message);
    fill(&mut source.error_message_l10n, &old.error_message_l10n);
    fill(&mut source.summary_message, &old.summary_message);
    fill(&mut source.summary_message_l10n, &old.summary_message_l10n);
    fill(&mut source.enabler, &old.enabler);
    source
}

fn fill<T: Clone>(slot: &mut Option<T>, fallback: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(fallback);
    }
}

/// Message fields set on `source` win over those of `target`.
fn override_messages(target: &mut ValidatorConfig, source: ValidatorConfig) {
    let ValidatorConfig {
        error_message,
        error_message_l10n,
        summary_message,
        summary_message_l10n,
        ..
    } = source;
    for (slot, value) in [
        (&mut target.error_message, error_message),
        (&mut target.error_message_l10n, error_message_l10n),
        (&mut target.summary_message, summary_message),
        (&mut target.summary_message_l10n, summary_message_l10n),
    ] {
        if value.is_some() {
            *slot = value;
        }
    }
}
