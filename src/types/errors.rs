//! # Type Registry Errors

use thiserror::Error;

/// Result type for type registry operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Type registry and resolver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Type not found: {0}")]
    NotFound(String),

    #[error("Type already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Cannot guess type of {0} value")]
    CannotGuess(String),

    #[error("Cannot cast value to {type_name}: {reason}")]
    CastFailed { type_name: String, reason: String },

    #[error("Invalid pattern for type {type_name}: {reason}")]
    InvalidPattern { type_name: String, reason: String },
}

impl TypeError {
    /// Shorthand for a cast failure
    pub fn cast(type_name: &str, reason: impl Into<String>) -> Self {
        TypeError::CastFailed {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(TypeError::NotFound("zip".into()).to_string(), "Type not found: zip");
        assert_eq!(
            TypeError::cast("integer", "not a number").to_string(),
            "Cannot cast value to integer: not a number"
        );
    }
}
