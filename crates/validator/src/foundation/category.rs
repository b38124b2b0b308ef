//! Condition categories
//!
//! Every condition belongs to a category. The category has no effect on how a
//! condition evaluates; it only decides the order in which a field runs its
//! validators: `Require` first, `DataTypeCheck` second, everything else in
//! declaration order.

use serde::{Deserialize, Serialize};

/// Category of a condition, used to order validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionCategory {
    /// Checks that a value was supplied.
    Require,
    /// Checks that the value has the expected data type.
    DataTypeCheck,
    /// Compares the value against something.
    Comparison,
    /// Combines child conditions.
    Children,
    /// Category not known or not relevant.
    Undetermined,
}

impl ConditionCategory {
    /// Sort rank. Lower runs first; equal ranks keep declaration order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Require => 0,
            Self::DataTypeCheck => 1,
            Self::Comparison | Self::Children | Self::Undetermined => 2,
        }
    }
}

/// Stable-sorts `items` by the rank of the category `category_of` reports.
pub fn sort_by_category<T>(items: &mut [T], category_of: impl Fn(&T) -> ConditionCategory) {
    items.sort_by_key(|item| category_of(item).rank());
}
