//! Configuration data
//!
//! Everything here is plain, serializable data. Nothing in this module
//! evaluates anything; the registry and the validation layer resolve these
//! descriptions into runtime objects lazily, on first use.

pub mod condition;
pub mod validator;
pub mod value_host;

pub use condition::{ConditionConfig, condition_types, params};
pub use validator::{ConditionCreator, ValidatorConfig, resolve_error_code};
pub use value_host::{ValueHostConfig, ValueHostKind, ValueHostsConfig};
