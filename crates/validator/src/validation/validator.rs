//! Runtime validator
//!
//! A [`Validator`] pairs one [`ValidatorConfig`] with the condition it
//! resolves to. The condition (and the optional enabler) is built on first
//! use and kept in an explicit memo cell for the validator's lifetime; a new
//! configuration means a new `Validator`.
//!
//! Evaluation never fails because of the condition itself: errors and panics
//! are logged and reported as `Undetermined`. Only configuration problems
//! (unknown type, missing child...) surface as [`ConfigError`].

use crate::conditions::ErrorResponse;
use crate::config::ValidatorConfig;
use crate::foundation::{
    Condition, ConditionCategory, ConditionError, ConditionEvaluateResult, ConditionNode,
    ConditionOutcome, ConfigError, ConfigResult, IssueFound, PendingEvaluation,
    ValidationServices, ValidationSeverity, ValueResolver,
};
use crate::validation::messages::{MessageContext, MessageSources};
use futures::FutureExt;
use serde_json::Value;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

// ============================================================================
// CONTEXT AND OUTCOMES
// ============================================================================

/// Inputs of one validator evaluation.
#[derive(Clone, Copy)]
pub struct ValidatorContext<'a> {
    /// Field being validated.
    pub value_host_name: &'a str,
    /// Display label of the field.
    pub label: &'a str,
    /// All field values.
    pub values: &'a dyn ValueResolver,
    /// Registry, localizer and settings.
    pub services: &'a ValidationServices,
    /// Skip Require validators (e.g. while the user is still typing).
    pub preliminary: bool,
}

/// Settled answer of one validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorResult {
    /// Resolved error code.
    pub error_code: String,
    /// Severity of the validator.
    pub severity: ValidationSeverity,
    /// Condition answer.
    pub condition_result: ConditionEvaluateResult,
    /// Present exactly when `condition_result` is `NoMatch`.
    pub issue_found: Option<IssueFound>,
}

/// A validator whose condition is still evaluating.
#[derive(Debug)]
pub struct PendingValidatorResult {
    error_code: String,
    severity: ValidationSeverity,
    value_host_name: String,
    issue: IssueFound,
    evaluation: PendingEvaluation,
}

impl PendingValidatorResult {
    /// Resolved error code of the validator.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Waits for the condition. Errors and panics are logged and become
    /// `Undetermined`.
    pub async fn settle(self) -> ValidatorResult {
        let Self {
            error_code,
            severity,
            value_host_name,
            issue,
            evaluation,
        } = self;
        let condition_type = evaluation.condition_type().to_owned();
        let condition_result = match AssertUnwindSafe(evaluation).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                error!(
                    value_host = %value_host_name,
                    error_code = %error_code,
                    condition_type = %condition_type,
                    error = %err,
                    "asynchronous condition failed"
                );
                ConditionEvaluateResult::Undetermined
            }
            Err(_) => {
                error!(
                    value_host = %value_host_name,
                    error_code = %error_code,
                    condition_type = %condition_type,
                    "asynchronous condition panicked"
                );
                ConditionEvaluateResult::Undetermined
            }
        };
        ValidatorResult {
            issue_found: condition_result.is_no_match().then_some(issue),
            error_code,
            severity,
            condition_result,
        }
    }
}

/// What one validator did during a pass.
#[derive(Debug)]
pub enum ValidatorOutcome {
    /// Disabled, enabler not matching, or a Require validator in a
    /// preliminary pass.
    Skipped,
    /// The condition answered synchronously.
    Completed(ValidatorResult),
    /// The condition answers later.
    Pending(PendingValidatorResult),
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// One validator of a field.
#[derive(Debug)]
pub struct Validator {
    value_host_name: String,
    config: ValidatorConfig,
    error_code: String,
    condition: Option<ConditionNode>,
    enabler: Option<Box<dyn Condition>>,
}

impl Validator {
    /// Wraps a config of field `value_host_name`. Nothing is built yet.
    pub fn new(value_host_name: impl Into<String>, config: ValidatorConfig) -> Self {
        let error_code = config.resolved_error_code();
        Self {
            value_host_name: value_host_name.into(),
            config,
            error_code,
            condition: None,
            enabler: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Resolved error code.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Configured severity.
    pub fn severity(&self) -> ValidationSeverity {
        self.config.severity
    }

    /// Returns true once the condition has been built.
    pub fn is_resolved(&self) -> bool {
        self.condition.is_some()
    }

    /// The condition, built on first call.
    pub fn condition(&mut self, services: &ValidationServices) -> ConfigResult<&ConditionNode> {
        let node = match self.condition.take() {
            Some(node) => node,
            None => self.build_condition(services)?,
        };
        Ok(self.condition.insert(node))
    }

    /// Category of the condition, building it if needed.
    pub fn category(&mut self, services: &ValidationServices) -> ConfigResult<ConditionCategory> {
        Ok(self.condition(services)?.category())
    }

    /// Adds every field name the condition and enabler read.
    pub fn gather_value_host_names(
        &mut self,
        services: &ValidationServices,
        names: &mut BTreeSet<String>,
    ) -> ConfigResult<()> {
        self.condition(services)?.gather_value_host_names(names);
        if let Some(enabler) = self.enabler(services)? {
            enabler.gather_value_host_names(names);
        }
        Ok(())
    }

    fn build_condition(&self, services: &ValidationServices) -> ConfigResult<ConditionNode> {
        match (&self.config.condition_config, &self.config.condition_creator) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingConditionSources {
                value_host: self.value_host_name.clone(),
                error_code: self.error_code.clone(),
            }),
            (Some(config), None) => services.registry().create(config),
            (None, Some(creator)) => Ok(creator(&self.config).unwrap_or_else(|| {
                warn!(
                    value_host = %self.value_host_name,
                    error_code = %self.error_code,
                    "condition creator returned nothing; validator will stay undetermined"
                );
                ConditionNode::from_sync(ErrorResponse::new(format!(
                    "condition creator of '{}' returned nothing",
                    self.error_code
                )))
            })),
            (None, None) => Err(ConfigError::MissingCondition {
                value_host: self.value_host_name.clone(),
                error_code: self.error_code.clone(),
            }),
        }
    }

    fn enabler(&mut self, services: &ValidationServices) -> ConfigResult<Option<&dyn Condition>> {
        let Some(config) = &self.config.enabler else {
            return Ok(None);
        };
        if self.enabler.is_none() {
            self.enabler = Some(services.registry().create_sync(config, &self.error_code)?);
        }
        Ok(self.enabler.as_deref())
    }

    /// Evaluates the validator.
    pub fn validate(&mut self, context: &ValidatorContext<'_>) -> ConfigResult<ValidatorOutcome> {
        if !self.config.enabled {
            debug!(
                value_host = %context.value_host_name,
                error_code = %self.error_code,
                "validator disabled"
            );
            return Ok(ValidatorOutcome::Skipped);
        }
        let services = context.services;
        let error_code = self.error_code.clone();
        if let Some(enabler) = self.enabler(services)? {
            let enabled = guarded(
                context.value_host_name,
                &error_code,
                enabler.condition_type(),
                || enabler.evaluate(None, context.values),
            );
            if !enabled.is_match() {
                debug!(
                    value_host = %context.value_host_name,
                    error_code = %error_code,
                    "validator not enabled"
                );
                return Ok(ValidatorOutcome::Skipped);
            }
        }

        let node = self.condition(services)?;
        if context.preliminary && node.category() == ConditionCategory::Require {
            return Ok(ValidatorOutcome::Skipped);
        }

        let condition_type = node.condition_type().to_owned();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
            node.evaluate(Some(context.value_host_name), context.values)
        })) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                log_failure(context.value_host_name, &error_code, &condition_type, &err);
                ConditionOutcome::Ready(ConditionEvaluateResult::Undetermined)
            }
            Err(_) => {
                log_panic(context.value_host_name, &error_code, &condition_type);
                ConditionOutcome::Ready(ConditionEvaluateResult::Undetermined)
            }
        };
        let tokens = node.message_tokens();

        let value = context.values.value(context.value_host_name);
        let issue = |this: &Self| this.issue(context, value.as_ref(), &tokens);
        Ok(match outcome {
            ConditionOutcome::Ready(condition_result) => {
                ValidatorOutcome::Completed(ValidatorResult {
                    issue_found: condition_result.is_no_match().then(|| issue(self)),
                    error_code,
                    severity: self.config.severity,
                    condition_result,
                })
            }
            ConditionOutcome::Pending(evaluation) => {
                debug!(
                    value_host = %context.value_host_name,
                    error_code = %error_code,
                    condition_type = %condition_type,
                    "validator pending"
                );
                ValidatorOutcome::Pending(PendingValidatorResult {
                    issue: issue(self),
                    error_code,
                    severity: self.config.severity,
                    value_host_name: context.value_host_name.to_owned(),
                    evaluation,
                })
            }
        })
    }

    fn issue(
        &self,
        context: &ValidatorContext<'_>,
        value: Option<&Value>,
        tokens: &[crate::foundation::MessageToken],
    ) -> IssueFound {
        let sources = MessageSources {
            error_message: self.config.error_message.as_deref(),
            error_message_l10n: self.config.error_message_l10n.as_deref(),
            summary_message: self.config.summary_message.as_deref(),
            summary_message_l10n: self.config.summary_message_l10n.as_deref(),
        };
        let rendered = sources.render(
            context.services,
            &MessageContext {
                label: context.label,
                value,
                error_code: &self.error_code,
                tokens,
            },
        );
        IssueFound {
            value_host_name: context.value_host_name.to_owned(),
            error_code: self.error_code.clone(),
            severity: self.config.severity,
            error_message: rendered.error_message,
            summary_message: rendered.summary_message,
        }
    }
}

/// Runs a synchronous evaluation, turning errors and panics into `Undetermined`.
fn guarded(
    value_host_name: &str,
    error_code: &str,
    condition_type: &str,
    evaluate: impl FnOnce() -> Result<ConditionEvaluateResult, ConditionError>,
) -> ConditionEvaluateResult {
    match panic::catch_unwind(AssertUnwindSafe(evaluate)) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            log_failure(value_host_name, error_code, condition_type, &err);
            ConditionEvaluateResult::Undetermined
        }
        Err(_) => {
            log_panic(value_host_name, error_code, condition_type);
            ConditionEvaluateResult::Undetermined
        }
    }
}

fn log_failure(
    value_host_name: &str,
    error_code: &str,
    condition_type: &str,
    err: &ConditionError,
) {
    error!(
        value_host = %value_host_name,
        error_code = %error_code,
        condition_type = %condition_type,
        error = %err,
        "condition failed; treating as undetermined"
    );
}

fn log_panic(value_host_name: &str, error_code: &str, condition_type: &str) {
    error!(
        value_host = %value_host_name,
        error_code = %error_code,
        condition_type = %condition_type,
        "condition panicked; treating as undetermined"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConditionConfig, condition_types};
    use crate::test_support::{self, fixed};
    use ConditionEvaluateResult::{Match, NoMatch, Undetermined};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn services() -> ValidationServices {
        ValidationServices::new().with_registry(test_support::registry())
    }

    fn run(
        validator: &mut Validator,
        values: &HashMap<String, Value>,
        preliminary: bool,
    ) -> ValidatorOutcome {
        let services = services();
        let context = ValidatorContext {
            value_host_name: "email",
            label: "Email",
            values,
            services: &services,
            preliminary,
        };
        validator.validate(&context).unwrap()
    }

    fn completed(outcome: ValidatorOutcome) -> ValidatorResult {
        match outcome {
            ValidatorOutcome::Completed(result) => result,
            other => panic!("expected a completed outcome, got {other:?}"),
        }
    }

    #[test]
    fn no_match_renders_an_issue() {
        let mut validator = Validator::new(
            "email",
            ValidatorConfig::new(ConditionConfig::require_text())
                .with_error_message("{Label} is required"),
        );
        let result = completed(run(&mut validator, &HashMap::new(), false));
        assert_eq!(result.condition_result, NoMatch);
        let issue = result.issue_found.unwrap();
        assert_eq!(issue.error_code, "RequireText");
        assert_eq!(issue.error_message, "Email is required");
        assert_eq!(issue.summary_message, "Email is required");
    }

    #[test]
    fn match_has_no_issue() {
        let mut validator = Validator::new("email", ValidatorConfig::new(fixed(Match)));
        let result = completed(run(&mut validator, &HashMap::new(), false));
        assert_eq!(result.condition_result, Match);
        assert!(result.issue_found.is_none());
    }

    #[test]
    fn disabled_and_not_enabled_are_skipped() {
        let mut disabled =
            Validator::new("email", ValidatorConfig::new(fixed(NoMatch)).with_enabled(false));
        assert!(matches!(run(&mut disabled, &HashMap::new(), false), ValidatorOutcome::Skipped));

        let mut gated = Validator::new(
            "email",
            ValidatorConfig::new(fixed(NoMatch))
                .with_enabler(ConditionConfig::equal_to_value(true).with_value_host("subscribe")),
        );
        let values = HashMap::from([("subscribe".to_owned(), json!(false))]);
        assert!(matches!(run(&mut gated, &values, false), ValidatorOutcome::Skipped));
        let values = HashMap::from([("subscribe".to_owned(), json!(true))]);
        assert_eq!(completed(run(&mut gated, &values, false)).condition_result, NoMatch);
    }

    #[test]
    fn preliminary_skips_require() {
        let mut validator =
            Validator::new("email", ValidatorConfig::new(ConditionConfig::require_text()));
        assert!(matches!(run(&mut validator, &HashMap::new(), true), ValidatorOutcome::Skipped));
    }

    #[test]
    fn condition_errors_become_undetermined() {
        let mut validator = Validator::new("email", ValidatorConfig::new(ConditionConfig::new(
            test_support::FAILING,
        )));
        let result = completed(run(&mut validator, &HashMap::new(), false));
        assert_eq!(result.condition_result, Undetermined);
        assert!(result.issue_found.is_none());
    }

    #[test]
    fn creator_returning_nothing_is_poisoned() {
        let mut validator =
            Validator::new("email", ValidatorConfig::with_creator("Custom", |_| None));
        let result = completed(run(&mut validator, &HashMap::new(), false));
        assert_eq!(result.condition_result, Undetermined);
        assert_eq!(result.error_code, "Custom");
        let services = services();
        assert_eq!(
            validator.condition(&services).unwrap().condition_type(),
            condition_types::ERROR_RESPONSE
        );
    }

    #[test]
    fn unknown_condition_type_is_a_config_error() {
        let mut validator =
            Validator::new("email", ValidatorConfig::new(ConditionConfig::new("Bogus")));
        let services = services();
        let context = ValidatorContext {
            value_host_name: "email",
            label: "Email",
            values: &crate::foundation::NoValues,
            services: &services,
            preliminary: false,
        };
        assert!(matches!(
            validator.validate(&context),
            Err(ConfigError::UnknownConditionType { .. })
        ));
    }

    #[test]
    fn condition_is_built_once() {
        let builds = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = std::sync::Arc::clone(&builds);
        let mut validator = Validator::new(
            "email",
            ValidatorConfig::with_creator("Counted", move |_| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Some(ConditionNode::from_sync(test_support::Fixed::new(Match)))
            }),
        );
        assert!(!validator.is_resolved());
        run(&mut validator, &HashMap::new(), false);
        run(&mut validator, &HashMap::new(), false);
        assert!(validator.is_resolved());
        assert_eq!(builds.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
