//! Error types
//!
//! Two families, handled very differently:
//!
//! - [`ConfigError`]: an authoring bug (unknown condition type, missing child,
//!   duplicate error code...). Always returned to whoever triggered the
//!   configuration work and never swallowed.
//! - [`ConditionError`]: something went wrong while evaluating a condition.
//!   The orchestrator logs it and treats the validator as `Undetermined`, so
//!   one broken rule never blocks a form.

/// Configuration-time error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No factory is registered for the condition type.
    #[error("unknown condition type '{condition_type}'")]
    UnknownConditionType { condition_type: String },

    /// A combinator is missing a required child slot.
    #[error("condition '{condition_type}' requires a {slot} condition")]
    MissingChildCondition {
        condition_type: String,
        slot: &'static str,
    },

    /// A combinator was given a child that may evaluate asynchronously.
    #[error(
        "condition '{combinator}' cannot hold asynchronous child '{child}'; \
         only validators may await conditions"
    )]
    AsyncChildNotSupported { combinator: String, child: String },

    /// A validator has neither a condition config nor a condition creator.
    #[error("validator '{error_code}' on '{value_host}' has no condition")]
    MissingCondition {
        value_host: String,
        error_code: String,
    },

    /// A validator has both a condition config and a condition creator.
    #[error(
        "validator '{error_code}' on '{value_host}' has both a condition config \
         and a condition creator"
    )]
    ConflictingConditionSources {
        value_host: String,
        error_code: String,
    },

    /// Two validators of one field resolve to the same error code.
    #[error("error code '{error_code}' is used more than once on '{value_host}'")]
    DuplicateErrorCode {
        value_host: String,
        error_code: String,
    },

    /// Two fields share a name.
    #[error("value host '{name}' is defined more than once")]
    DuplicateValueHost { name: String },

    /// A builder chain declared a field with a conflicting kind or twice.
    #[error("value host '{name}' was already declared in this builder as {existing}")]
    NamingConflict { name: String, existing: String },

    /// A field was referenced that the configuration does not define.
    #[error("value host '{name}' is not defined")]
    UnknownValueHost { name: String },

    /// No validator with the error code exists on the field.
    #[error("no validator with error code '{error_code}' on '{value_host}'")]
    UnknownValidator {
        value_host: String,
        error_code: String,
    },

    /// Conditions produced by a `condition_creator` cannot be combined or rewritten.
    #[error("validator '{error_code}' on '{value_host}' has no condition config to merge")]
    NotMergeable {
        value_host: String,
        error_code: String,
    },

    /// A condition parameter is missing or malformed.
    #[error("condition '{condition_type}': invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        condition_type: String,
        parameter: String,
        reason: String,
    },

    /// An alias was registered for a condition type that has no factory.
    #[error("cannot alias '{alias}' to unregistered condition type '{target}'")]
    AliasTargetMissing { alias: String, target: String },

    /// A configuration document failed to parse.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidParameter`].
    pub fn invalid_parameter(
        condition_type: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            condition_type: condition_type.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

/// Evaluation-time error. Recovered by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConditionError {
    /// A synchronous evaluation path reached a child that only evaluates asynchronously.
    #[error("condition '{combinator}' reached asynchronous child '{child}' on a synchronous path")]
    AsyncChildNotSupported { combinator: String, child: String },

    /// The condition could not complete.
    #[error("condition '{condition_type}' failed: {message}")]
    Failed {
        condition_type: String,
        message: String,
    },

    /// A pending evaluation was dropped before it produced a result.
    ///
    /// Asynchronous conditions return this when the source they wait on goes
    /// away, e.g. a closed channel. The validator records Undetermined.
    #[error("condition '{condition_type}' was abandoned before completing")]
    Abandoned { condition_type: String },
}

impl ConditionError {
    /// Shorthand for [`ConditionError::Failed`].
    pub fn failed(condition_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            condition_type: condition_type.into(),
            message: message.into(),
        }
    }
}

/// Result alias for configuration work.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for condition evaluation.
pub type EvaluateResult<T> = Result<T, ConditionError>;
