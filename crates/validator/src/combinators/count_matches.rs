//! COUNT MATCHES combinator - a range over the number of matching children
//!
//! Matches when the number of children answering `Match` lies within the
//! inclusive `[minimum, maximum]` range. Either bound may be omitted. Children
//! are remapped through `treatUndeterminedAs` the same way [`All`] and
//! [`Any`] do, and an unresolved `Undetermined` child makes the whole
//! condition `Undetermined`.
//!
//! [`All`]: super::All
//! [`Any`]: super::Any

use super::group::ChildConditions;
use crate::config::{ConditionConfig, condition_types, params};
use crate::foundation::{
    Condition, ConditionCategory, ConditionEvaluateResult, ConfigError, ConfigResult,
    EvaluateResult, MessageToken, ValueResolver,
};
use crate::registry::ConditionRegistry;
use std::collections::BTreeSet;

/// Matches when the count of matching children is within bounds.
#[derive(Debug)]
pub struct CountMatches {
    condition_type: String,
    category: ConditionCategory,
    minimum: Option<u32>,
    maximum: Option<u32>,
    children: ChildConditions,
}

impl CountMatches {
    /// Creates a `CountMatches`. Fails when `minimum > maximum`.
    pub fn new(
        minimum: Option<u32>,
        maximum: Option<u32>,
        children: ChildConditions,
    ) -> ConfigResult<Self> {
        check_bounds(condition_types::COUNT_MATCHES, minimum, maximum)?;
        Ok(Self {
            condition_type: condition_types::COUNT_MATCHES.to_owned(),
            category: ConditionCategory::Children,
            minimum,
            maximum,
            children,
        })
    }

    /// Builds from a config.
    pub fn from_config(
        config: &ConditionConfig,
        registry: &ConditionRegistry,
    ) -> ConfigResult<Self> {
        let minimum = config.u32_param(params::MINIMUM)?;
        let maximum = config.u32_param(params::MAXIMUM)?;
        check_bounds(&config.condition_type, minimum, maximum)?;
        Ok(Self {
            condition_type: config.condition_type.clone(),
            category: config.category_or(ConditionCategory::Children),
            minimum,
            maximum,
            children: ChildConditions::from_config(config, registry)?,
        })
    }

    fn in_range(&self, count: u32) -> bool {
        self.minimum.is_none_or(|min| count >= min) && self.maximum.is_none_or(|max| count <= max)
    }
}

fn check_bounds(
    condition_type: &str,
    minimum: Option<u32>,
    maximum: Option<u32>,
) -> ConfigResult<()> {
    match (minimum, maximum) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::invalid_parameter(
            condition_type,
            params::MINIMUM,
            format!("minimum {min} exceeds maximum {max}"),
        )),
        _ => Ok(()),
    }
}

impl Condition for CountMatches {
    fn condition_type(&self) -> &str {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        if self.children.is_empty() {
            return Ok(ConditionEvaluateResult::Undetermined);
        }
        let mut matches = 0u32;
        for result in self.children.results(value_host_name, values) {
            match result? {
                ConditionEvaluateResult::Match => matches += 1,
                ConditionEvaluateResult::NoMatch => {}
                ConditionEvaluateResult::Undetermined => {
                    return Ok(ConditionEvaluateResult::Undetermined);
                }
            }
        }
        Ok(self.in_range(matches).into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        self.children.gather_value_host_names(names);
    }

    fn message_tokens(&self) -> Vec<MessageToken> {
        let bound = |b: Option<u32>| b.map(|n| n.to_string()).unwrap_or_default();
        vec![("Minimum", bound(self.minimum)), ("Maximum", bound(self.maximum))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::NoValues;
    use crate::test_support::{self, fixed};
    use ConditionEvaluateResult::{Match, NoMatch, Undetermined};
    use rstest::rstest;

    fn build(config: &ConditionConfig) -> crate::foundation::ConditionNode {
        test_support::registry().create(config).unwrap()
    }

    #[rstest]
    #[case(Some(1), Some(2), &[Match, NoMatch, NoMatch], Match)]
    #[case(Some(2), None, &[Match, NoMatch, NoMatch], NoMatch)]
    #[case(None, Some(1), &[Match, Match], NoMatch)]
    #[case(None, None, &[NoMatch], Match)]
    #[case(Some(0), Some(0), &[NoMatch, NoMatch], Match)]
    #[case(Some(1), None, &[Match, Undetermined], Undetermined)]
    fn counts_matching_children(
        #[case] minimum: Option<u32>,
        #[case] maximum: Option<u32>,
        #[case] children: &[ConditionEvaluateResult],
        #[case] expected: ConditionEvaluateResult,
    ) {
        let config = ConditionConfig::count_matches(
            minimum,
            maximum,
            children.iter().copied().map(fixed).collect(),
        );
        let node = build(&config);
        assert_eq!(node.evaluate(None, &NoValues).unwrap().ready(), Some(expected));
    }

    #[test]
    fn empty_children_are_undetermined() {
        let node = build(&ConditionConfig::count_matches(Some(0), None, vec![]));
        assert_eq!(
            node.evaluate(None, &NoValues).unwrap().ready(),
            Some(Undetermined)
        );
    }

    #[test]
    fn undetermined_children_can_be_counted() {
        let config =
            ConditionConfig::count_matches(Some(2), None, vec![fixed(Match), fixed(Undetermined)])
                .treat_undetermined_as(Match);
        let node = build(&config);
        assert_eq!(node.evaluate(None, &NoValues).unwrap().ready(), Some(Match));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = test_support::registry()
            .create(&ConditionConfig::count_matches(Some(3), Some(1), vec![fixed(Match)]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn exposes_bounds_as_message_tokens() {
        let count =
            CountMatches::new(Some(1), None, ChildConditions::new(vec![], Undetermined)).unwrap();
        assert_eq!(
            count.message_tokens(),
            vec![("Minimum", "1".to_owned()), ("Maximum", String::new())]
        );
    }
}
