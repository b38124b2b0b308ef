//! Field validation through the manager: ordering, messages, severity,
//! business-logic errors and asynchronous validators.

use formgate_validator::prelude::*;
use futures::channel::oneshot;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const EMAIL_CONFIG: &str = r#"{
    "valueHosts": [{
        "name": "email",
        "label": "Email",
        "validatorConfigs": [
            {
                "conditionConfig": { "conditionType": "RegExp", "expression": ".+@.+" },
                "errorMessage": "{Label} '{Value}' must match {Expression}",
                "summaryMessage": "Bad email"
            },
            {
                "conditionConfig": { "conditionType": "RequireText" },
                "errorMessage": "{Label} is required"
            }
        ]
    }]
}"#;

fn email_manager() -> ValidationManager {
    ValidationManager::from_json_str(EMAIL_CONFIG, ValidationServices::new()).unwrap()
}

/// Answers when the test sends a result through the matching channel.
#[derive(Debug, Clone, Default)]
struct Remote {
    senders: Arc<Mutex<Vec<oneshot::Sender<ConditionEvaluateResult>>>>,
}

impl Remote {
    fn answer(&self, index: usize, result: ConditionEvaluateResult) {
        let sender = self.senders.lock().remove(index);
        sender.send(result).unwrap();
    }

    fn abandon_all(&self) {
        self.senders.lock().clear();
    }
}

impl AsyncCondition for Remote {
    fn condition_type(&self) -> &str {
        "Remote"
    }

    fn category(&self) -> ConditionCategory {
        ConditionCategory::Comparison
    }

    fn evaluate(
        &self,
        _value_host_name: Option<&str>,
        _values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionOutcome> {
        let (sender, receiver) = oneshot::channel();
        self.senders.lock().push(sender);
        Ok(ConditionOutcome::Pending(PendingEvaluation::new(
            "Remote",
            async move {
                receiver.await.map_err(|_| ConditionError::Abandoned {
                    condition_type: "Remote".to_owned(),
                })
            },
        )))
    }
}

#[derive(Debug)]
struct Broken {
    panics: bool,
}

impl Condition for Broken {
    fn condition_type(&self) -> &str {
        "Broken"
    }

    fn category(&self) -> ConditionCategory {
        ConditionCategory::Comparison
    }

    fn evaluate(
        &self,
        _value_host_name: Option<&str>,
        _values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        if self.panics {
            panic!("broken condition");
        }
        Err(ConditionError::failed("Broken", "backend unavailable"))
    }
}

// ============================================================================
// ORDERING AND MESSAGES
// ============================================================================

#[test]
fn require_runs_first_and_messages_render_tokens() {
    let mut manager = email_manager();
    let codes: Vec<_> = {
        manager.set_value("email", "").unwrap();
        let state = manager
            .validate("email", ValidateOptions::default())
            .unwrap()
            .state;
        state.issues_found.iter().map(|i| i.error_code.clone()).collect()
    };
    assert_eq!(codes, vec!["RequireText".to_owned()]);

    manager.set_value("email", "ada").unwrap();
    let state = manager
        .validate("email", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.status, ValidationStatus::Invalid);
    let issue = state.issue("RegExp").unwrap();
    assert_eq!(issue.error_message, "Email 'ada' must match .+@.+");
    assert_eq!(issue.summary_message, "Bad email");
}

#[test]
fn preliminary_pass_skips_require() {
    let mut manager = email_manager();
    manager.set_value("email", "").unwrap();
    let state = manager
        .validate("email", ValidateOptions::preliminary())
        .unwrap()
        .state;
    assert_eq!(state.status, ValidationStatus::Undetermined);
    assert!(state.issues_found.is_empty());
}

#[test]
fn correcting_a_value_is_flagged() {
    let mut manager = email_manager();
    manager.set_value("email", "ada").unwrap();
    manager.validate("email", ValidateOptions::default()).unwrap();
    manager.set_value("email", "ada@example.com").unwrap();
    let state = manager
        .validate("email", ValidateOptions::default())
        .unwrap()
        .state;
    assert!(state.is_valid());
    assert!(state.corrected);
}

// ============================================================================
// SEVERITY
// ============================================================================

fn digits_config() -> ValueHostsConfig {
    ValueHostsConfig::new(vec![
        ValueHostConfig::input("code")
            .with_validator(
                ValidatorConfig::new(ConditionConfig::regexp(r"^\d+$"))
                    .with_severity(ValidationSeverity::Severe),
            )
            .with_validator(
                ValidatorConfig::new(ConditionConfig::regexp("^.{3,}$")).with_error_code("Length"),
            ),
    ])
}

#[test]
fn severe_issue_stops_the_field() {
    let mut manager = ValidationManager::new(digits_config(), ValidationServices::new()).unwrap();
    manager.set_value("code", "ab").unwrap();
    let state = manager
        .validate("code", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.issues_found.len(), 1);
    assert_eq!(state.issues_found[0].severity, ValidationSeverity::Severe);
}

#[test]
fn severe_issue_can_be_configured_to_continue() {
    let settings = ValidationSettings {
        stop_on_severe: false,
        ..ValidationSettings::default()
    };
    let services = ValidationServices::new().with_settings(settings);
    let mut manager = ValidationManager::new(digits_config(), services).unwrap();
    manager.set_value("code", "ab").unwrap();
    let state = manager
        .validate("code", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.issues_found.len(), 2);
}

#[test]
fn warnings_do_not_invalidate() {
    let config = ValueHostsConfig::new(vec![ValueHostConfig::input("nickname").with_validator(
        ValidatorConfig::new(ConditionConfig::regexp("^[a-z]+$"))
            .with_severity(ValidationSeverity::Warning),
    )]);
    let mut manager = ValidationManager::new(config, ValidationServices::new()).unwrap();
    manager.set_value("nickname", "Ada").unwrap();
    let state = manager
        .validate("nickname", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.status, ValidationStatus::Valid);
    assert_eq!(state.issues_found.len(), 1);
}

// ============================================================================
// FAILURES
// ============================================================================

#[rstest::rstest]
#[case(false)]
#[case(true)]
fn failing_conditions_are_undetermined(#[case] panics: bool) {
    let mut registry = ConditionRegistry::with_builtins();
    registry.register("Broken", move |_, _| {
        Ok(ConditionNode::from_sync(Broken { panics }))
    });
    let config = ValueHostsConfig::new(vec![
        ValueHostConfig::input("zip")
            .with_validator(ValidatorConfig::new(ConditionConfig::new("Broken"))),
    ]);
    let services = ValidationServices::new().with_registry(registry);
    let mut manager = ValidationManager::new(config, services).unwrap();
    manager.set_value("zip", "12345").unwrap();
    let state = manager
        .validate("zip", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.status, ValidationStatus::Undetermined);
    assert!(state.issues_found.is_empty());
}

#[test]
fn unknown_condition_type_surfaces_on_validate() {
    let config = ValueHostsConfig::new(vec![
        ValueHostConfig::input("zip")
            .with_validator(ValidatorConfig::new(ConditionConfig::new("Bogus"))),
    ]);
    let mut manager = ValidationManager::new(config, ValidationServices::new()).unwrap();
    assert!(matches!(
        manager.validate("zip", ValidateOptions::default()),
        Err(ConfigError::UnknownConditionType { .. })
    ));
}

// ============================================================================
// BUSINESS LOGIC ERRORS
// ============================================================================

#[test]
fn unmatched_business_logic_error_shows_until_cleared() {
    let mut manager = email_manager();
    manager.set_value("email", "ada@example.com").unwrap();
    manager.validate("email", ValidateOptions::default()).unwrap();

    let state = manager
        .set_business_logic_error("email", BusinessLogicError::new("Already registered"))
        .unwrap();
    assert_eq!(state.status, ValidationStatus::Invalid);
    assert_eq!(
        state.issue("BusinessLogic").unwrap().error_message,
        "Already registered"
    );

    let state = manager.clear_business_logic_errors("email").unwrap();
    assert!(state.is_valid());
}

#[test]
fn matched_business_logic_error_overrides_then_clears() {
    let mut manager = email_manager();
    manager
        .set_business_logic_error(
            "email",
            BusinessLogicError::new("Server rejected this address").with_error_code("RegExp"),
        )
        .unwrap();

    manager.set_value("email", "ada").unwrap();
    let state = manager
        .validate("email", ValidateOptions::default())
        .unwrap()
        .state;
    assert_eq!(state.issues_found.len(), 1);
    assert_eq!(
        state.issue("RegExp").unwrap().error_message,
        "Server rejected this address"
    );

    manager.set_value("email", "ada@example.com").unwrap();
    let state = manager
        .validate("email", ValidateOptions::default())
        .unwrap()
        .state;
    assert!(state.is_valid());
    assert!(
        manager
            .value_host("email")
            .unwrap()
            .business_logic_errors()
            .is_empty()
    );
}

// ============================================================================
// STATE CHANGE NOTIFICATIONS
// ============================================================================

#[test]
fn handler_fires_only_when_state_changes() {
    let mut manager = email_manager();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    manager.on_validation_state_changed(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    manager.set_value("email", "ada").unwrap();
    manager.validate("email", ValidateOptions::default()).unwrap();
    manager.validate("email", ValidateOptions::default()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    manager.set_value("email", "ada@example.com").unwrap();
    let quiet = ValidateOptions {
        skip_callback: true,
        ..ValidateOptions::default()
    };
    manager.validate("email", quiet).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// ASYNCHRONOUS VALIDATORS
// ============================================================================

fn remote_manager(remote: &Remote) -> ValidationManager {
    let mut registry = ConditionRegistry::with_builtins();
    let condition = remote.clone();
    registry.register("Remote", move |_, _| {
        Ok(ConditionNode::from_async(condition.clone()))
    });
    let config = ValueHostsConfig::new(vec![
        ValueHostConfig::input("username")
            .with_validator(ValidatorConfig::new(ConditionConfig::require_text()))
            .with_validator(
                ValidatorConfig::new(ConditionConfig::new("Remote"))
                    .with_error_message("{Label} is taken"),
            ),
    ]);
    ValidationManager::new(config, ValidationServices::new().with_registry(registry)).unwrap()
}

#[tokio::test]
async fn async_validator_settles_into_the_state() {
    let remote = Remote::default();
    let mut manager = remote_manager(&remote);
    manager.set_value("username", "ada").unwrap();

    let result = manager
        .validate("username", ValidateOptions::default())
        .unwrap();
    assert!(result.state.async_pending);
    assert_eq!(result.state.status, ValidationStatus::Valid);
    assert_eq!(result.pending.len(), 1);
    assert_eq!(result.pending[0].error_code(), "Remote");

    remote.answer(0, ConditionEvaluateResult::NoMatch);
    let settled = futures::future::join_all(result.pending).await;
    let state = settled[0].clone().unwrap();
    assert!(!state.async_pending);
    assert_eq!(state.status, ValidationStatus::Invalid);
    assert_eq!(state.issue("Remote").unwrap().error_message, "username is taken");
}

#[tokio::test]
async fn abandoned_async_validator_settles_undetermined() {
    let remote = Remote::default();
    let mut manager = remote_manager(&remote);
    manager.set_value("username", "ada").unwrap();

    let mut result = manager
        .validate("username", ValidateOptions::default())
        .unwrap();
    remote.abandon_all();
    let state = result.pending.remove(0).await.unwrap();
    assert!(!state.async_pending);
    assert_eq!(state.status, ValidationStatus::Valid);
    assert!(state.issue("Remote").is_none());
}

#[tokio::test]
async fn stale_async_result_is_discarded() {
    let remote = Remote::default();
    let mut manager = remote_manager(&remote);

    manager.set_value("username", "ada").unwrap();
    let first = manager
        .validate("username", ValidateOptions::default())
        .unwrap();
    manager.set_value("username", "grace").unwrap();
    let second = manager
        .validate("username", ValidateOptions::default())
        .unwrap();

    remote.answer(1, ConditionEvaluateResult::Match);
    remote.answer(0, ConditionEvaluateResult::NoMatch);

    let mut second = second.pending;
    let latest = second.remove(0).await.unwrap();
    assert!(latest.is_valid());

    let mut first = first.pending;
    assert_eq!(first.remove(0).await, None);
    assert!(manager.validation_state("username").unwrap().is_valid());
}

#[tokio::test]
async fn validate_and_settle_waits_for_pending() {
    let remote = Remote::default();
    let mut manager = remote_manager(&remote);
    manager.set_value("username", "ada").unwrap();

    let answering = remote.clone();
    let settle = manager.validate_and_settle("username", ValidateOptions::default());
    let (state, ()) = futures::join!(settle, async move {
        while answering.senders.lock().is_empty() {
            tokio::task::yield_now().await;
        }
        answering.answer(0, ConditionEvaluateResult::Match);
    });
    let state = state.unwrap();
    assert!(state.is_valid());
    assert!(!state.async_pending);
}
