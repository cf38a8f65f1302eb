//! formwork - schema-driven form data processing
//!
//! Compiles JSON-Schema-like property schemas and UI hints into four-phase
//! rule sets, runs submitted values through a rule engine and reports
//! per-field errors without aborting the batch.

pub mod config;
pub mod engine;
pub mod form;
pub mod observability;
pub mod processor;
pub mod rules;
pub mod schema;
pub mod types;

mod patterns;

pub use config::{ConfigError, ConfigResult, FormworkConfig};
pub use engine::{RuleEngine, RuleFailure, StandardRuleEngine};
pub use form::{Data, Field, Form, FormError, UiElement};
pub use processor::{FormDataProcessor, ProcessResult};
pub use rules::{RuleSet, RuleToken, SchemaToRulesMapper};
pub use schema::{FormSchema, PropertySchema, SchemaError};
pub use types::{TypeRegistry, TypeResolver, ValueType};
