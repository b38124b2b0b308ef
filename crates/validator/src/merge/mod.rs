//! Configuration merging
//!
//! - [`engine`]: merge/combine rules for fields and validators
//! - [`ConfigModifier`]: copy-on-write layer over a published configuration

pub mod engine;
pub mod modifier;

pub use engine::{
    CombineUsing, MergeStrategy, merge_validator, merge_value_host, merge_value_hosts,
    replace_condition_with,
};
pub use modifier::ConfigModifier;
