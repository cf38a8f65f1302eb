//! Property schema model
//!
//! JSON-Schema-like descriptions of form fields. Schemas are loaded once,
//! when a form is defined, and are read-only afterwards.
//!
//! # Design Principles
//!
//! - Closed set of kinds; `kind` never changes after construction
//! - Unknown discriminators fail loudly
//! - `$ref` resolved at load time, bounded by a depth guard and a node budget
//! - `to_value` output loads back to an equal schema

mod errors;
mod form_schema;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use form_schema::FormSchema;
pub use loader::{SchemaLoader, DEFAULT_MAX_NODES};
pub use types::{
    AdditionalProperties, ArrayConstraints, KindTag, NumericConstraints, ObjectConstraints,
    PropertySchema, SchemaKind, StringConstraints,
};
