//! Rule compilation
//!
//! Compiles property schemas (with UI control hints) into ordered rule sets
//! of four phases: cast, sanitize, transform, validate. Token strings are
//! the contract with the rule engine.
//!
//! # Usage
//!
//! ```ignore
//! use formwork::rules::SchemaToRulesMapper;
//!
//! let mapper = SchemaToRulesMapper::new(&config);
//! let rules = mapper.map_form_to_rules(&form);
//! assert_eq!(rules["email"].cast.as_ref().map(|t| t.name()), Some("string"));
//! ```

mod mapper;
mod rule_set;
pub mod tables;

pub use mapper::SchemaToRulesMapper;
pub use rule_set::{Phase, RuleSet, RuleToken};
