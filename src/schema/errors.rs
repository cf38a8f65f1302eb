//! Schema error types
//!
//! Error codes:
//! - FORM_SCHEMA_MALFORMED (structure is not a valid property schema)
//! - FORM_SCHEMA_UNKNOWN_KIND (unregistered `type` discriminator)
//! - FORM_SCHEMA_MISSING_KIND (no `type` and nothing to infer it from)
//! - FORM_SCHEMA_UNRESOLVED_REF (`$ref` target not in definitions)
//! - FORM_SCHEMA_CYCLIC_REF (`$ref` chain refers back to itself)
//! - FORM_SCHEMA_DEPTH_EXCEEDED (nesting deeper than the configured guard)
//! - FORM_SCHEMA_TOO_LARGE (expanded schema exceeds the node budget)
//!
//! All schema errors are configuration errors: they surface while a schema is
//! loaded and are never retried.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Structure is not a valid property schema
    Malformed,
    /// `type` names a kind no parser is registered for
    UnknownKind,
    /// `type` is absent and cannot be inferred
    MissingKind,
    /// `$ref` does not point into definitions
    UnresolvedRef,
    /// `$ref` chain loops
    CyclicRef,
    /// Nesting exceeds the depth guard
    DepthExceeded,
    /// Expanded schema has more nodes than the budget allows
    TooLarge,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::Malformed => "FORM_SCHEMA_MALFORMED",
            SchemaErrorCode::UnknownKind => "FORM_SCHEMA_UNKNOWN_KIND",
            SchemaErrorCode::MissingKind => "FORM_SCHEMA_MISSING_KIND",
            SchemaErrorCode::UnresolvedRef => "FORM_SCHEMA_UNRESOLVED_REF",
            SchemaErrorCode::CyclicRef => "FORM_SCHEMA_CYCLIC_REF",
            SchemaErrorCode::DepthExceeded => "FORM_SCHEMA_DEPTH_EXCEEDED",
            SchemaErrorCode::TooLarge => "FORM_SCHEMA_TOO_LARGE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the JSON path of the offending node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// JSON-pointer-like location, e.g. `#/properties/address/items`
    path: String,
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::Malformed,
            message: reason.into(),
            path: path.into(),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(path: impl Into<String>, kind: &str) -> Self {
        Self {
            code: SchemaErrorCode::UnknownKind,
            message: format!("unknown discriminator '{}'", kind),
            path: path.into(),
        }
    }

    /// Create a missing kind error
    pub fn missing_kind(path: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MissingKind,
            message: "schema has no 'type' and none can be inferred".into(),
            path: path.into(),
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved_ref(path: impl Into<String>, reference: &str) -> Self {
        Self {
            code: SchemaErrorCode::UnresolvedRef,
            message: format!("reference '{}' not found in definitions", reference),
            path: path.into(),
        }
    }

    /// Create a cyclic reference error
    pub fn cyclic_ref(path: impl Into<String>, reference: &str) -> Self {
        Self {
            code: SchemaErrorCode::CyclicRef,
            message: format!("reference '{}' refers back to itself", reference),
            path: path.into(),
        }
    }

    /// Create a depth exceeded error
    pub fn depth_exceeded(path: impl Into<String>, max_depth: usize) -> Self {
        Self {
            code: SchemaErrorCode::DepthExceeded,
            message: format!("schema nesting exceeds maximum depth of {}", max_depth),
            path: path.into(),
        }
    }

    /// Create a node budget exceeded error
    pub fn too_large(path: impl Into<String>, max_nodes: usize) -> Self {
        Self {
            code: SchemaErrorCode::TooLarge,
            message: format!("expanded schema exceeds the budget of {} nodes", max_nodes),
            path: path.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location of the offending node
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.code.code(), self.path, self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
