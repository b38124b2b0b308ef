//! Validation runtime
//!
//! - [`Validator`]: one validator with its lazily built condition
//! - [`ValueHost`]: one field and its validation pass
//! - [`messages`]: message localization and `{Token}` rendering

pub mod messages;
pub mod validator;
pub mod value_host;

pub use messages::{MessageContext, MessageSources, RenderedMessages, render};
pub use validator::{
    PendingValidatorResult, Validator, ValidatorContext, ValidatorOutcome, ValidatorResult,
};
pub use value_host::{
    BusinessLogicError, PendingValidation, StateChangedHandler, ValidateOptions, ValueHost,
    ValueHostValidateResult,
};
