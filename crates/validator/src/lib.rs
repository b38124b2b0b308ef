//! # formgate-validator
//!
//! A business-rule validation engine for forms and business objects.
//!
//! Rules are declared as data ([`config`]) or through a fluent
//! [`builder`], turned into tri-state condition trees by a
//! [`ConditionRegistry`](registry::ConditionRegistry), and evaluated per
//! field by the [`ValidationManager`](manager::ValidationManager).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formgate_validator::prelude::*;
//!
//! let config = ValueHostsBuilder::new()
//!     .input("email")?
//!     .label("Email")
//!     .require_text()
//!     .regexp(".+@.+")
//!     .error_message("{Label} must contain '@'")
//!     .build()?;
//!
//! let mut manager = ValidationManager::new(config, ValidationServices::new())?;
//! manager.set_value("email", "ada")?;
//! let state = manager.validate("email", ValidateOptions::default())?.state;
//! assert_eq!(state.status, ValidationStatus::Invalid);
//! ```
//!
//! ## Conditions
//!
//! Every condition answers `Match`, `NoMatch` or `Undetermined`.
//!
//! - **Leaves**: [`RequireText`](conditions::RequireText),
//!   [`DataTypeCheck`](conditions::DataTypeCheck),
//!   [`EqualToValue`](conditions::EqualToValue), [`RegExp`](conditions::RegExp)
//! - **Combinators**: [`All`](combinators::All), [`Any`](combinators::Any),
//!   [`Not`](combinators::Not), [`CountMatches`](combinators::CountMatches),
//!   [`When`](combinators::When)
//!
//! Custom conditions implement [`Condition`](foundation::Condition) or
//! [`AsyncCondition`](foundation::AsyncCondition) and are registered by type
//! name.
//!
//! ## Reconfiguration
//!
//! [`merge`] layers changes onto a published configuration without mutating
//! it: replace, combine, delete or rewrite individual validators, then
//! publish the result with
//! [`ValidationManager::apply_modifications`](manager::ValidationManager::apply_modifications).

pub mod builder;
pub mod combinators;
pub mod conditions;
pub mod config;
pub mod foundation;
pub mod manager;
pub mod merge;
pub mod prelude;
pub mod registry;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
