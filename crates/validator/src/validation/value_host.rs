//! Field-level validation pass
//!
//! A [`ValueHost`] owns one field's configuration and its [`Validator`]s, and
//! drives them in category order:
//!
//! 1. The pass starts `Undetermined` and bumps the field's generation.
//! 2. Synchronous answers are folded in declaration order (Require first,
//!    then DataTypeCheck, then the rest). A Severe issue stops the remaining
//!    validators.
//! 3. Asynchronous answers come back as [`PendingValidation`] futures. Each
//!    one folds its answer into the shared state when driven, unless a newer
//!    pass has started in the meantime.
//!
//! Business-logic errors (errors reported by a server or another layer) are
//! kept with the field state. One whose error code matches a validator lends
//! its message and severity to that validator's issue, and is cleared when
//! that validator matches. The others are reported as free-standing issues.

use crate::config::{ValidatorConfig, ValueHostConfig};
use crate::foundation::{
    ConditionEvaluateResult, ConfigResult, IssueFound, ValidationServices, ValidationSeverity,
    ValidationStatus, ValueHostValidationState, ValueResolver, sort_by_category,
};
use crate::validation::validator::{
    PendingValidatorResult, Validator, ValidatorContext, ValidatorOutcome, ValidatorResult,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

/// Called whenever a field's externally visible state changes.
pub type StateChangedHandler = Arc<dyn Fn(&ValueHostValidationState) + Send + Sync>;

// ============================================================================
// OPTIONS AND BUSINESS-LOGIC ERRORS
// ============================================================================

/// Options of one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Skip Require validators, e.g. while the user is still typing.
    pub preliminary: bool,
    /// Do not invoke the state-changed handler for this pass.
    pub skip_callback: bool,
}

impl ValidateOptions {
    /// Options of a preliminary pass.
    #[must_use]
    pub fn preliminary() -> Self {
        Self {
            preliminary: true,
            ..Self::default()
        }
    }
}

/// An error reported for a field by business logic outside the validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLogicError {
    /// Matches a validator by resolved error code when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Message shown next to the field.
    pub error_message: String,
    /// Summary message; defaults to the error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_message: Option<String>,
    /// Severity of the error.
    #[serde(default)]
    pub severity: ValidationSeverity,
}

impl BusinessLogicError {
    /// Creates an Error-severity business-logic error.
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_code: None,
            error_message: error_message.into(),
            summary_message: None,
            severity: ValidationSeverity::Error,
        }
    }

    /// Sets the error code.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// Sets the summary message.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_summary_message(mut self, summary_message: impl Into<String>) -> Self {
        self.summary_message = Some(summary_message.into());
        self
    }

    /// Sets the severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: ValidationSeverity) -> Self {
        self.severity = severity;
        self
    }

    fn summary(&self) -> String {
        self.summary_message
            .clone()
            .unwrap_or_else(|| self.error_message.clone())
    }
}

// ============================================================================
// SHARED FIELD STATE
// ============================================================================

struct HostState {
    value_host_name: String,
    generation: u64,
    status: ValidationStatus,
    issues: Vec<IssueFound>,
    pending: usize,
    previous_status: ValidationStatus,
    business_logic_errors: Vec<BusinessLogicError>,
    unmatched_code: String,
    handler: Option<StateChangedHandler>,
    last_reported: Option<ValueHostValidationState>,
}

impl HostState {
    fn new(value_host_name: &str, unmatched_code: &str) -> Self {
        Self {
            value_host_name: value_host_name.to_owned(),
            generation: 0,
            status: ValidationStatus::Undetermined,
            issues: Vec::new(),
            pending: 0,
            previous_status: ValidationStatus::Undetermined,
            business_logic_errors: Vec::new(),
            unmatched_code: unmatched_code.to_owned(),
            handler: None,
            last_reported: None,
        }
    }

    fn begin_pass(&mut self) -> u64 {
        self.previous_status = self.snapshot().status;
        self.generation += 1;
        self.status = ValidationStatus::Undetermined;
        self.issues.clear();
        self.pending = 0;
        self.generation
    }

    /// Folds one settled validator. Returns true when the result is a Severe issue.
    fn record(&mut self, result: ValidatorResult) -> bool {
        let ValidatorResult {
            error_code,
            mut severity,
            condition_result,
            issue_found,
        } = result;
        match condition_result {
            ConditionEvaluateResult::Undetermined => {}
            ConditionEvaluateResult::Match => {
                self.business_logic_errors
                    .retain(|e| e.error_code.as_deref() != Some(error_code.as_str()));
                self.status = self.status.fold(condition_result, severity);
            }
            ConditionEvaluateResult::NoMatch => {
                let Some(mut issue) = issue_found else {
                    return false;
                };
                if let Some(ble) = self
                    .business_logic_errors
                    .iter()
                    .find(|e| e.error_code.as_deref() == Some(error_code.as_str()))
                {
                    issue.error_message = ble.error_message.clone();
                    issue.summary_message = ble.summary();
                    issue.severity = ble.severity;
                    severity = ble.severity;
                }
                self.status = self.status.fold(condition_result, severity);
                self.issues.push(issue);
                return severity == ValidationSeverity::Severe;
            }
        }
        false
    }

    fn snapshot(&self) -> ValueHostValidationState {
        let mut status = self.status;
        let mut issues_found = self.issues.clone();
        for ble in &self.business_logic_errors {
            if let Some(code) = ble.error_code.as_deref()
                && self.issues.iter().any(|i| i.error_code == code)
            {
                continue;
            }
            let error_code = ble
                .error_code
                .clone()
                .unwrap_or_else(|| self.unmatched_code.clone());
            status = status.fold(ConditionEvaluateResult::NoMatch, ble.severity);
            issues_found.push(IssueFound {
                value_host_name: self.value_host_name.clone(),
                error_code,
                severity: ble.severity,
                error_message: ble.error_message.clone(),
                summary_message: ble.summary(),
            });
        }
        ValueHostValidationState {
            value_host_name: self.value_host_name.clone(),
            corrected: self.previous_status == ValidationStatus::Invalid
                && status == ValidationStatus::Valid,
            status,
            issues_found,
            async_pending: self.pending > 0,
        }
    }
}

/// Reports the current state to the handler when it differs from the last report.
fn notify_if_changed(state: &Mutex<HostState>, skip_callback: bool) -> ValueHostValidationState {
    let (snapshot, handler) = {
        let mut guard = state.lock();
        let snapshot = guard.snapshot();
        if guard.last_reported.as_ref() == Some(&snapshot) {
            return snapshot;
        }
        guard.last_reported = Some(snapshot.clone());
        let handler = if skip_callback {
            None
        } else {
            guard.handler.clone()
        };
        (snapshot, handler)
    };
    if let Some(handler) = handler {
        handler(&snapshot);
    }
    snapshot
}

// ============================================================================
// PENDING VALIDATION
// ============================================================================

/// An asynchronous validator of a pass that has not settled yet.
///
/// Driving it folds the answer into the field state and returns the new
/// state, or `None` when a newer pass started first. Dropping it without
/// driving it leaves the field marked `async_pending` until the next pass.
#[must_use = "pending validations do nothing unless awaited"]
pub struct PendingValidation {
    error_code: String,
    future: BoxFuture<'static, Option<ValueHostValidationState>>,
}

impl PendingValidation {
    fn new(
        state: Arc<Mutex<HostState>>,
        generation: u64,
        skip_callback: bool,
        pending: PendingValidatorResult,
    ) -> Self {
        let error_code = pending.error_code().to_owned();
        let future = async move {
            let result = pending.settle().await;
            {
                let mut guard = state.lock();
                if guard.generation != generation {
                    debug!(
                        value_host = %guard.value_host_name,
                        error_code = %result.error_code,
                        generation,
                        current = guard.generation,
                        "discarding stale asynchronous result"
                    );
                    return None;
                }
                guard.pending = guard.pending.saturating_sub(1);
                guard.record(result);
            }
            Some(notify_if_changed(&state, skip_callback))
        }
        .boxed();
        Self { error_code, future }
    }

    /// Error code of the validator still evaluating.
    pub fn error_code(&self) -> &str {
        &self.error_code
    }
}

impl Future for PendingValidation {
    type Output = Option<ValueHostValidationState>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingValidation")
            .field("error_code", &self.error_code)
            .finish_non_exhaustive()
    }
}

/// Result of [`ValueHost::validate`].
#[derive(Debug)]
pub struct ValueHostValidateResult {
    /// State after the synchronous validators.
    pub state: ValueHostValidationState,
    /// Asynchronous validators still running.
    pub pending: Vec<PendingValidation>,
}

// ============================================================================
// VALUE HOST
// ============================================================================

/// One field with its validators and validation state.
pub struct ValueHost {
    config: ValueHostConfig,
    validators: Vec<Validator>,
    ordered: bool,
    state: Arc<Mutex<HostState>>,
}

impl ValueHost {
    /// Creates a field from its config. The config is checked; conditions
    /// are built on the first pass.
    pub fn new(config: ValueHostConfig, services: &ValidationServices) -> ConfigResult<Self> {
        config.validate()?;
        let validators = config
            .validator_configs
            .iter()
            .cloned()
            .map(|vc| Validator::new(config.name.clone(), vc))
            .collect();
        let state = HostState::new(
            &config.name,
            &services.settings().unmatched_business_logic_code,
        );
        Ok(Self {
            config,
            validators,
            ordered: false,
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration.
    pub fn config(&self) -> &ValueHostConfig {
        &self.config
    }

    /// Display label: localized label, else label, else name.
    pub fn label(&self, services: &ValidationServices) -> String {
        services
            .localize(self.config.label_l10n.as_deref(), self.config.label.as_deref())
            .unwrap_or_else(|| self.config.name.clone())
    }

    /// Installs the state-changed handler.
    pub fn set_state_changed_handler(&self, handler: Option<StateChangedHandler>) {
        self.state.lock().handler = handler;
    }

    /// Current state.
    pub fn validation_state(&self) -> ValueHostValidationState {
        self.state.lock().snapshot()
    }

    /// Validator by resolved error code.
    pub fn validator(&self, error_code: &str) -> Option<&Validator> {
        self.validators.iter().find(|v| v.error_code() == error_code)
    }

    /// Config of the validator with the given resolved error code.
    pub fn validator_config(&self, error_code: &str) -> Option<&ValidatorConfig> {
        self.validator(error_code).map(Validator::config)
    }

    /// Validators in evaluation order (declaration order until the first pass).
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Builds every condition and orders the validators by category. Runs once.
    fn ensure_ordered(&mut self, services: &ValidationServices) -> ConfigResult<()> {
        if self.ordered {
            return Ok(());
        }
        let mut categories = Vec::with_capacity(self.validators.len());
        for validator in &mut self.validators {
            categories.push(validator.category(services)?);
        }
        let mut keyed: Vec<_> = categories
            .into_iter()
            .zip(std::mem::take(&mut self.validators))
            .collect();
        sort_by_category(&mut keyed, |(category, _)| *category);
        self.validators = keyed.into_iter().map(|(_, validator)| validator).collect();
        self.ordered = true;
        Ok(())
    }

    /// Field names read by the conditions of this field.
    pub fn referenced_value_hosts(
        &mut self,
        services: &ValidationServices,
    ) -> ConfigResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for validator in &mut self.validators {
            validator.gather_value_host_names(services, &mut names)?;
        }
        Ok(names)
    }

    /// Runs one validation pass.
    pub fn validate(
        &mut self,
        values: &dyn ValueResolver,
        services: &ValidationServices,
        options: ValidateOptions,
    ) -> ConfigResult<ValueHostValidateResult> {
        self.ensure_ordered(services)?;
        let label = self.label(services);
        let generation = self.state.lock().begin_pass();
        let context = ValidatorContext {
            value_host_name: &self.config.name,
            label: &label,
            values,
            services,
            preliminary: options.preliminary,
        };

        let mut pending = Vec::new();
        for validator in &mut self.validators {
            match validator.validate(&context)? {
                ValidatorOutcome::Skipped => {}
                ValidatorOutcome::Completed(result) => {
                    let severe = self.state.lock().record(result);
                    if severe && services.settings().stop_on_severe {
                        debug!(
                            value_host = %self.config.name,
                            error_code = %validator.error_code(),
                            "severe issue; skipping remaining validators"
                        );
                        break;
                    }
                }
                ValidatorOutcome::Pending(result) => {
                    self.state.lock().pending += 1;
                    pending.push(PendingValidation::new(
                        Arc::clone(&self.state),
                        generation,
                        options.skip_callback,
                        result,
                    ));
                }
            }
        }

        let state = notify_if_changed(&self.state, options.skip_callback);
        Ok(ValueHostValidateResult { state, pending })
    }

    /// Adds a business-logic error and reports the new state immediately.
    ///
    /// An error with the same explicit code as a held one replaces it.
    /// Errors without a code accumulate.
    pub fn set_business_logic_error(&self, error: BusinessLogicError) -> ValueHostValidationState {
        {
            let mut guard = self.state.lock();
            let existing = error.error_code.as_deref().and_then(|code| {
                guard
                    .business_logic_errors
                    .iter()
                    .position(|e| e.error_code.as_deref() == Some(code))
            });
            match existing {
                Some(index) => guard.business_logic_errors[index] = error,
                None => guard.business_logic_errors.push(error),
            }
        }
        notify_if_changed(&self.state, false)
    }

    /// Removes every business-logic error. Returns the new state.
    pub fn clear_business_logic_errors(&self) -> ValueHostValidationState {
        self.state.lock().business_logic_errors.clear();
        notify_if_changed(&self.state, false)
    }

    /// Business-logic errors currently held.
    pub fn business_logic_errors(&self) -> Vec<BusinessLogicError> {
        self.state.lock().business_logic_errors.clone()
    }
}

impl fmt::Debug for ValueHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHost")
            .field("name", &self.config.name)
            .field("validators", &self.validators.len())
            .field("ordered", &self.ordered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConditionConfig;
    use crate::foundation::{ConditionNode, ValidationSettings};
    use crate::test_support::{self, fixed};
    use ConditionEvaluateResult::{Match, NoMatch};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn services() -> ValidationServices {
        ValidationServices::new().with_registry(test_support::registry())
    }

    fn host(config: ValueHostConfig) -> ValueHost {
        ValueHost::new(config, &services()).unwrap()
    }

    fn codes(state: &ValueHostValidationState) -> Vec<&str> {
        state.issues_found.iter().map(|i| i.error_code.as_str()).collect()
    }

    #[test]
    fn require_and_data_type_run_first() {
        let mut host = host(
            ValueHostConfig::input("age")
                .with_validator(ValidatorConfig::new(fixed(NoMatch)).with_error_code("Range"))
                .with_validator(ValidatorConfig::new(ConditionConfig::data_type_check("Integer")))
                .with_validator(ValidatorConfig::new(ConditionConfig::require_text())),
        );
        let values: HashMap<String, Value> = HashMap::from([("age".to_owned(), json!("x"))]);
        let result = host
            .validate(&values, &services(), ValidateOptions::default())
            .unwrap();
        assert_eq!(codes(&result.state), vec!["DataTypeCheck", "Range"]);
        let order: Vec<_> = host.validators().iter().map(Validator::error_code).collect();
        assert_eq!(order, vec!["RequireText", "DataTypeCheck", "Range"]);
    }

    #[test]
    fn warning_keeps_the_field_valid() {
        let mut host = host(
            ValueHostConfig::input("name").with_validator(
                ValidatorConfig::new(fixed(NoMatch))
                    .with_error_code("Soft")
                    .with_severity(ValidationSeverity::Warning),
            ),
        );
        let result = host
            .validate(&HashMap::new(), &services(), ValidateOptions::default())
            .unwrap();
        assert_eq!(result.state.status, ValidationStatus::Valid);
        assert_eq!(codes(&result.state), vec!["Soft"]);
    }

    #[test]
    fn severe_stops_remaining_validators() {
        let mut host = host(
            ValueHostConfig::input("name")
                .with_validator(
                    ValidatorConfig::new(fixed(NoMatch))
                        .with_error_code("First")
                        .with_severity(ValidationSeverity::Severe),
                )
                .with_validator(ValidatorConfig::new(fixed(NoMatch)).with_error_code("Second")),
        );
        let result = host
            .validate(&HashMap::new(), &services(), ValidateOptions::default())
            .unwrap();
        assert_eq!(codes(&result.state), vec!["First"]);

        let lenient = services().with_settings(ValidationSettings {
            stop_on_severe: false,
            ..ValidationSettings::default()
        });
        let result = host
            .validate(&HashMap::new(), &lenient, ValidateOptions::default())
            .unwrap();
        assert_eq!(codes(&result.state), vec!["First", "Second"]);
    }

    #[test]
    fn severe_issue_skips_validators_declared_after_it() {
        let last = test_support::Fixed::new(Match);
        let creator = last.clone();
        let mut host = host(
            ValueHostConfig::input("name")
                .with_validator(ValidatorConfig::new(fixed(NoMatch)).with_error_code("A"))
                .with_validator(
                    ValidatorConfig::new(fixed(NoMatch))
                        .with_error_code("B")
                        .with_severity(ValidationSeverity::Severe),
                )
                .with_validator(ValidatorConfig::with_creator("C", move |_| {
                    Some(ConditionNode::from_sync(creator.clone()))
                })),
        );
        let result = host
            .validate(&HashMap::new(), &services(), ValidateOptions::default())
            .unwrap();
        assert_eq!(codes(&result.state), vec!["A", "B"]);
        assert_eq!(result.state.status, ValidationStatus::Invalid);
        assert_eq!(last.calls(), 0);
    }

    #[test]
    fn corrected_after_invalid_to_valid() {
        let mut host = host(
            ValueHostConfig::input("email")
                .with_validator(ValidatorConfig::new(ConditionConfig::require_text())),
        );
        let services = services();
        let empty: HashMap<String, Value> = HashMap::new();
        let first = host.validate(&empty, &services, ValidateOptions::default()).unwrap();
        assert_eq!(first.state.status, ValidationStatus::Invalid);
        assert!(!first.state.corrected);

        let filled: HashMap<String, Value> = HashMap::from([("email".to_owned(), json!("a@b.c"))]);
        let second = host.validate(&filled, &services, ValidateOptions::default()).unwrap();
        assert_eq!(second.state.status, ValidationStatus::Valid);
        assert!(second.state.corrected);

        let third = host.validate(&filled, &services, ValidateOptions::default()).unwrap();
        assert!(!third.state.corrected);
    }

    #[test]
    fn business_logic_errors_match_by_error_code() {
        let mut host = host(
            ValueHostConfig::input("email")
                .with_validator(ValidatorConfig::new(fixed(NoMatch)).with_error_code("Taken")),
        );
        let services = services();
        let state = host.set_business_logic_error(
            BusinessLogicError::new("Already registered").with_error_code("Taken"),
        );
        assert_eq!(state.status, ValidationStatus::Invalid);
        assert_eq!(state.issues_found[0].error_message, "Already registered");

        let result = host
            .validate(&HashMap::new(), &services, ValidateOptions::default())
            .unwrap();
        assert_eq!(result.state.issues_found.len(), 1);
        assert_eq!(result.state.issues_found[0].error_message, "Already registered");
    }

    #[test]
    fn matching_validator_clears_its_business_logic_error() {
        let mut host = host(
            ValueHostConfig::input("email")
                .with_validator(ValidatorConfig::new(fixed(Match)).with_error_code("Taken")),
        );
        host.set_business_logic_error(
            BusinessLogicError::new("Already registered").with_error_code("Taken"),
        );
        let result = host
            .validate(&HashMap::new(), &services(), ValidateOptions::default())
            .unwrap();
        assert_eq!(result.state.status, ValidationStatus::Valid);
        assert!(host.business_logic_errors().is_empty());
    }

    #[test]
    fn unmatched_business_logic_errors_persist_until_cleared() {
        let mut host = host(
            ValueHostConfig::input("email")
                .with_validator(ValidatorConfig::new(fixed(Match)).with_error_code("Format")),
        );
        let services = services();
        host.set_business_logic_error(BusinessLogicError::new("Server says no"));
        for _ in 0..2 {
            let result = host
                .validate(&HashMap::new(), &services, ValidateOptions::default())
                .unwrap();
            assert_eq!(result.state.status, ValidationStatus::Invalid);
            assert_eq!(codes(&result.state), vec!["BusinessLogic"]);
        }
        let state = host.clear_business_logic_errors();
        assert_eq!(state.status, ValidationStatus::Valid);
        assert!(state.issues_found.is_empty());
    }

    #[test]
    fn uncoded_business_logic_errors_each_show() {
        let host = host(ValueHostConfig::input("email"));
        host.set_business_logic_error(BusinessLogicError::new("first"));
        let state = host.set_business_logic_error(BusinessLogicError::new("second"));
        let messages: Vec<_> = state
            .issues_found
            .iter()
            .map(|i| i.error_message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(codes(&state), vec!["BusinessLogic", "BusinessLogic"]);
    }

    #[test]
    fn same_code_business_logic_error_replaces_the_held_one() {
        let host = host(ValueHostConfig::input("email"));
        host.set_business_logic_error(BusinessLogicError::new("old").with_error_code("Taken"));
        let state =
            host.set_business_logic_error(BusinessLogicError::new("new").with_error_code("Taken"));
        assert_eq!(host.business_logic_errors().len(), 1);
        assert_eq!(state.issues_found.len(), 1);
        assert_eq!(state.issues_found[0].error_message, "new");
    }

    #[test]
    fn handler_fires_only_on_change() {
        let mut host = host(
            ValueHostConfig::input("email")
                .with_validator(ValidatorConfig::new(ConditionConfig::require_text())),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        host.set_state_changed_handler(Some(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        let services = services();
        let empty: HashMap<String, Value> = HashMap::new();
        host.validate(&empty, &services, ValidateOptions::default()).unwrap();
        host.validate(&empty, &services, ValidateOptions::default()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let skip = ValidateOptions {
            skip_callback: true,
            ..ValidateOptions::default()
        };
        let filled: HashMap<String, Value> = HashMap::from([("email".to_owned(), json!("x"))]);
        host.validate(&filled, &services, skip).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_error_codes_are_rejected() {
        let config = ValueHostConfig::input("email")
            .with_validator(ValidatorConfig::new(ConditionConfig::require_text()))
            .with_validator(ValidatorConfig::new(ConditionConfig::require_text()));
        assert!(ValueHost::new(config, &services()).is_err());
    }
}
