//! # Form Errors
//!
//! Configuration errors raised while a form definition is built.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for form operations
pub type FormResult<T> = Result<T, FormError>;

/// Form definition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Unknown UI element type '{element_type}' at {path}")]
    UnknownElement { element_type: String, path: String },

    #[error("Malformed UI schema at {path}: {reason}")]
    MalformedUiSchema { path: String, reason: String },

    #[error("Invalid control scope '{0}'")]
    InvalidScope(String),

    #[error("Control scope '{0}' does not resolve to a schema property")]
    ScopeNotFound(String),

    #[error("Malformed form data: {0}")]
    MalformedData(String),

    #[error("Malformed form definition: {0}")]
    MalformedDefinition(String),
}

impl FormError {
    pub(crate) fn ui(path: &str, reason: impl Into<String>) -> Self {
        FormError::MalformedUiSchema {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_converts() {
        let err: FormError = SchemaError::missing_kind("#/properties/x").into();
        assert!(err.to_string().starts_with("Invalid schema:"));
        assert!(err.to_string().contains("#/properties/x"));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FormError::ScopeNotFound("#/properties/ghost".into()).to_string(),
            "Control scope '#/properties/ghost' does not resolve to a schema property"
        );
    }
}
