//! Combinators for composing conditions
//!
//! Combinators hold other conditions and fold their tri-state answers:
//!
//! - **Logical**: [`All`], [`Any`], [`Not`]
//! - **Counting**: [`CountMatches`]
//! - **Conditional**: [`When`]
//!
//! Children are resolved once, when the combinator is built, and must be
//! synchronous. Only `When` accepts an asynchronous child, in which case the
//! combinator itself becomes asynchronous.
//!
//! # Examples
//!
//! ```rust,ignore
//! use formgate_validator::config::ConditionConfig;
//!
//! let config = ConditionConfig::any(vec![
//!     ConditionConfig::regexp(r"^\d{5}$"),
//!     ConditionConfig::regexp(r"^\d{5}-\d{4}$"),
//! ]);
//! let node = registry.create(&config)?;
//! ```

pub mod count_matches;
pub mod group;
pub mod not;
pub mod when;

pub use count_matches::CountMatches;
pub use group::{All, Any, ChildConditions};
pub use not::Not;
pub use when::When;

use crate::config::condition_types;
use crate::foundation::ConditionNode;
use crate::registry::ConditionRegistry;

/// Registers the factories of every combinator.
pub fn register_all(registry: &mut ConditionRegistry) {
    registry.register(condition_types::ALL, |config, registry| {
        All::from_config(config, registry).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::ANY, |config, registry| {
        Any::from_config(config, registry).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::NOT, |config, registry| {
        Not::from_config(config, registry).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::COUNT_MATCHES, |config, registry| {
        CountMatches::from_config(config, registry).map(ConditionNode::from_sync)
    });
    registry.register(condition_types::WHEN, |config, registry| {
        When::from_config(config, registry).map(When::into_node)
    });
}
