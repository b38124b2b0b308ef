//! Property-based tests for the tri-state combinators.

use formgate_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;

// Leaf configs whose answer is controlled by the value of their own field:
// "yes" matches, "no" does not, a number is undetermined.
fn leaf(index: usize) -> ConditionConfig {
    ConditionConfig::regexp("^yes$").with_value_host(format!("f{index}"))
}

fn tri_state() -> impl Strategy<Value = ConditionEvaluateResult> {
    prop_oneof![
        Just(ConditionEvaluateResult::Match),
        Just(ConditionEvaluateResult::NoMatch),
        Just(ConditionEvaluateResult::Undetermined),
    ]
}

fn values_for(answers: &[ConditionEvaluateResult]) -> HashMap<String, Value> {
    answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let value = match answer {
                ConditionEvaluateResult::Match => json!("yes"),
                ConditionEvaluateResult::NoMatch => json!("no"),
                ConditionEvaluateResult::Undetermined => json!(0),
            };
            (format!("f{i}"), value)
        })
        .collect()
}

fn evaluate(config: &ConditionConfig, values: &HashMap<String, Value>) -> ConditionEvaluateResult {
    ConditionRegistry::with_builtins()
        .create(config)
        .unwrap()
        .evaluate(Some("field"), values)
        .unwrap()
        .ready()
        .unwrap()
}

// ============================================================================
// LEAF CONTROL: the generated answers reach the combinators unchanged
// ============================================================================

proptest! {
    #[test]
    fn leaves_answer_as_generated(answer in tri_state()) {
        let values = values_for(&[answer]);
        prop_assert_eq!(evaluate(&leaf(0), &values), answer);
    }
}

// ============================================================================
// COMBINATOR LAWS
// ============================================================================

proptest! {
    #[test]
    fn not_is_an_involution(answer in tri_state()) {
        let values = values_for(&[answer]);
        let twice = ConditionConfig::not(ConditionConfig::not(leaf(0)));
        prop_assert_eq!(evaluate(&twice, &values), answer);
    }

    #[test]
    fn not_swaps_match_and_no_match(answer in tri_state()) {
        let values = values_for(&[answer]);
        prop_assert_eq!(evaluate(&ConditionConfig::not(leaf(0)), &values), answer.negate());
    }

    #[test]
    fn all_matches_iff_every_child_matches(
        answers in prop::collection::vec(tri_state(), 1..6)
    ) {
        let values = values_for(&answers);
        let config = ConditionConfig::all((0..answers.len()).map(leaf).collect());
        let result = evaluate(&config, &values);
        let all_match = answers.iter().all(|a| a.is_match());
        prop_assert_eq!(result.is_match(), all_match);
    }

    #[test]
    fn any_no_match_iff_every_child_fails(
        answers in prop::collection::vec(tri_state(), 1..6)
    ) {
        let values = values_for(&answers);
        let config = ConditionConfig::any((0..answers.len()).map(leaf).collect());
        let result = evaluate(&config, &values);
        let all_fail = answers.iter().all(|a| a.is_no_match());
        prop_assert_eq!(result.is_no_match(), all_fail);
    }

    #[test]
    fn lenient_groups_never_answer_undetermined(
        answers in prop::collection::vec(tri_state(), 1..6)
    ) {
        let values = values_for(&answers);
        let children: Vec<_> = (0..answers.len()).map(leaf).collect();
        let all = ConditionConfig::all(children.clone())
            .treat_undetermined_as(ConditionEvaluateResult::Match);
        let any = ConditionConfig::any(children)
            .treat_undetermined_as(ConditionEvaluateResult::NoMatch);
        prop_assert!(!evaluate(&all, &values).is_undetermined());
        prop_assert!(!evaluate(&any, &values).is_undetermined());
    }

    #[test]
    fn count_matches_agrees_with_a_count(
        answers in prop::collection::vec(
            prop_oneof![
                Just(ConditionEvaluateResult::Match),
                Just(ConditionEvaluateResult::NoMatch),
            ],
            1..6,
        )
    ) {
        let values = values_for(&answers);
        let config = ConditionConfig::count_matches(
            Some(1),
            Some(2),
            (0..answers.len()).map(leaf).collect(),
        );
        let matched = answers.iter().filter(|a| a.is_match()).count();
        let expected = if (1..=2).contains(&matched) {
            ConditionEvaluateResult::Match
        } else {
            ConditionEvaluateResult::NoMatch
        };
        prop_assert_eq!(evaluate(&config, &values), expected);
    }
}
