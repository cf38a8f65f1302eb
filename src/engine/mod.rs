//! Rule engine boundary
//!
//! The processor hands each field's raw value and compiled rule set to a
//! [`RuleEngine`]. [`StandardRuleEngine`] implements every token the
//! mapper emits; callers may plug in their own.

mod cast;
mod date_format;
mod errors;
mod filters;
mod standard;
mod validators;

pub use errors::{RuleFailure, RuleResult};
pub use standard::StandardRuleEngine;

use serde_json::Value;

use crate::rules::RuleSet;

/// Executes one field's rule set.
pub trait RuleEngine: Send + Sync {
    /// Returns the processed value, or why it was rejected.
    fn process(&self, value: &Value, rules: &RuleSet) -> RuleResult<Value>;
}
