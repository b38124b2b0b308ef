//! Condition traits and the resolved condition node
//!
//! Conditions come in two capabilities:
//!
//! - [`Condition`]: answers synchronously. Every combinator requires its
//!   children to be of this kind.
//! - [`AsyncCondition`]: may answer later through a [`PendingEvaluation`].
//!   Only the validator orchestration layer is allowed to hold one.
//!
//! [`ConditionNode`] is the resolved, owned form of either. Combinators turn a
//! child node into a `Box<dyn Condition>` with [`ConditionNode::into_sync`],
//! so an asynchronous child under a combinator is rejected while the tree is
//! being built rather than when it runs.

use crate::foundation::category::ConditionCategory;
use crate::foundation::error::{ConditionError, ConfigError, ConfigResult, EvaluateResult};
use crate::foundation::result::ConditionEvaluateResult;
use crate::foundation::values::ValueResolver;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A `{Name}` placeholder and its replacement, contributed to validator messages.
pub type MessageToken = (&'static str, String);

// ============================================================================
// SYNCHRONOUS CONDITIONS
// ============================================================================

/// A predicate evaluated synchronously against named values.
///
/// Leaf implementations answer `Undetermined` when the value is missing or has
/// the wrong shape. `Err` is for genuine failures; the orchestrator logs it and
/// also treats it as `Undetermined`.
pub trait Condition: Send + Sync + fmt::Debug {
    /// Type identifier, as registered in the `ConditionRegistry`.
    fn condition_type(&self) -> &str;

    /// Category used to order validators.
    fn category(&self) -> ConditionCategory;

    /// Evaluates the predicate.
    ///
    /// `value_host_name` is the field being validated. Conditions configured
    /// with their own field reference ignore it; enablers receive `None`.
    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult>;

    /// Adds every field name this condition reads to `names`.
    fn gather_value_host_names(&self, _names: &mut BTreeSet<String>) {}

    /// Tokens this condition contributes to validator messages.
    fn message_tokens(&self) -> Vec<MessageToken> {
        Vec::new()
    }
}

// ============================================================================
// ASYNCHRONOUS CONDITIONS
// ============================================================================

/// A predicate that may need to await something external (a lookup, a
/// server round trip) before it can answer.
pub trait AsyncCondition: Send + Sync + fmt::Debug {
    /// Type identifier, as registered in the `ConditionRegistry`.
    fn condition_type(&self) -> &str;

    /// Category used to order validators.
    fn category(&self) -> ConditionCategory;

    /// Starts the evaluation. May answer immediately with
    /// [`ConditionOutcome::Ready`]. A pending future must own everything it
    /// needs; it outlives this call.
    fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionOutcome>;

    /// Adds every field name this condition reads to `names`.
    fn gather_value_host_names(&self, _names: &mut BTreeSet<String>) {}

    /// Tokens this condition contributes to validator messages.
    fn message_tokens(&self) -> Vec<MessageToken> {
        Vec::new()
    }
}

/// An evaluation that has not settled yet.
pub struct PendingEvaluation {
    condition_type: String,
    future: BoxFuture<'static, EvaluateResult<ConditionEvaluateResult>>,
}

impl PendingEvaluation {
    /// Wraps a future that will produce the condition result.
    pub fn new<F>(condition_type: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = EvaluateResult<ConditionEvaluateResult>> + Send + 'static,
    {
        Self {
            condition_type: condition_type.into(),
            future: future.boxed(),
        }
    }

    /// Type of the condition that started this evaluation.
    pub fn condition_type(&self) -> &str {
        &self.condition_type
    }
}

impl Future for PendingEvaluation {
    type Output = EvaluateResult<ConditionEvaluateResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingEvaluation")
            .field("condition_type", &self.condition_type)
            .finish_non_exhaustive()
    }
}

/// Answer of an [`AsyncCondition`].
#[derive(Debug)]
pub enum ConditionOutcome {
    /// The result is already known.
    Ready(ConditionEvaluateResult),
    /// The result will be produced by the pending evaluation.
    Pending(PendingEvaluation),
}

impl ConditionOutcome {
    /// Returns the result if it is already known.
    #[must_use]
    pub fn ready(&self) -> Option<ConditionEvaluateResult> {
        match self {
            Self::Ready(result) => Some(*result),
            Self::Pending(_) => None,
        }
    }

    /// Returns true when the outcome still has to be awaited.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl From<ConditionEvaluateResult> for ConditionOutcome {
    fn from(result: ConditionEvaluateResult) -> Self {
        Self::Ready(result)
    }
}

// ============================================================================
// CONDITION NODE
// ============================================================================

/// A resolved condition, owned by exactly one parent (validator or combinator).
#[derive(Debug)]
pub enum ConditionNode {
    /// Answers synchronously.
    Sync(Box<dyn Condition>),
    /// May answer asynchronously.
    Async(Box<dyn AsyncCondition>),
}

impl ConditionNode {
    /// Wraps a synchronous condition.
    pub fn from_sync(condition: impl Condition + 'static) -> Self {
        Self::Sync(Box::new(condition))
    }

    /// Wraps an asynchronous condition.
    pub fn from_async(condition: impl AsyncCondition + 'static) -> Self {
        Self::Async(Box::new(condition))
    }

    /// Type identifier of the wrapped condition.
    pub fn condition_type(&self) -> &str {
        match self {
            Self::Sync(c) => c.condition_type(),
            Self::Async(c) => c.condition_type(),
        }
    }

    /// Category of the wrapped condition.
    pub fn category(&self) -> ConditionCategory {
        match self {
            Self::Sync(c) => c.category(),
            Self::Async(c) => c.category(),
        }
    }

    /// Returns true when the node may answer asynchronously.
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Evaluates either kind, surfacing asynchronous answers as
    /// [`ConditionOutcome::Pending`].
    pub fn evaluate(
        &self,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionOutcome> {
        match self {
            Self::Sync(c) => c.evaluate(value_host_name, values).map(ConditionOutcome::Ready),
            Self::Async(c) => c.evaluate(value_host_name, values),
        }
    }

    /// Evaluates a node that must answer synchronously.
    pub fn evaluate_sync(
        &self,
        owner: &str,
        value_host_name: Option<&str>,
        values: &dyn ValueResolver,
    ) -> EvaluateResult<ConditionEvaluateResult> {
        match self {
            Self::Sync(c) => c.evaluate(value_host_name, values),
            Self::Async(c) => Err(ConditionError::AsyncChildNotSupported {
                combinator: owner.to_owned(),
                child: c.condition_type().to_owned(),
            }),
        }
    }

    /// Adds every field name the node reads to `names`.
    pub fn gather_value_host_names(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Sync(c) => c.gather_value_host_names(names),
            Self::Async(c) => c.gather_value_host_names(names),
        }
    }

    /// Tokens the wrapped condition contributes to messages.
    pub fn message_tokens(&self) -> Vec<MessageToken> {
        match self {
            Self::Sync(c) => c.message_tokens(),
            Self::Async(c) => c.message_tokens(),
        }
    }

    /// Unwraps a synchronous node for use as a combinator child.
    pub fn into_sync(self, combinator: &str) -> ConfigResult<Box<dyn Condition>> {
        match self {
            Self::Sync(c) => Ok(c),
            Self::Async(c) => Err(ConfigError::AsyncChildNotSupported {
                combinator: combinator.to_owned(),
                child: c.condition_type().to_owned(),
            }),
        }
    }
}
