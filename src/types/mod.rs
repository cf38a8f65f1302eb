//! Type registry and resolver
//!
//! A catalog of reusable value types (email, uuid, date, ...). Each type can
//! validate and cast a raw value and describe its own schema fragment. The
//! resolver guesses a type for untyped input.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use formwork::types::{TypeRegistry, TypeResolver};
//!
//! let registry = Arc::new(TypeRegistry::with_defaults()?);
//! let resolver = TypeResolver::new(Arc::clone(&registry));
//! assert_eq!(resolver.guess(&serde_json::json!("a@b.io"))?.name(), "email");
//! ```

mod builtin;
mod errors;
mod registry;
mod resolver;
mod value_type;

pub use builtin::{
    ArrayType, BooleanType, DateTimeType, DateType, EmailType, FloatType, HostnameType,
    IntegerType, IpType, ObjectType, PatternType, TextType, TimeType, UrlType, UuidType,
};
pub use errors::{TypeError, TypeResult};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use resolver::{RawValue, TypeResolver};
pub use value_type::{merge_options, ValueType};

/// Registry names of the built-in types
pub const TEXT: &str = "text";
pub const EMAIL: &str = "email";
pub const URL: &str = "url";
pub const UUID: &str = "uuid";
pub const DATE: &str = "date";
pub const DATETIME: &str = "datetime";
pub const TIME: &str = "time";
pub const IP: &str = "ip";
pub const HOSTNAME: &str = "hostname";
pub const INTEGER: &str = "integer";
pub const FLOAT: &str = "float";
pub const BOOLEAN: &str = "boolean";
pub const ARRAY: &str = "array";
pub const OBJECT: &str = "object";
