//! # Rule Failures
//!
//! Outcome of a rule engine run that did not produce a value.

use thiserror::Error;

/// Result type for rule engine runs
pub type RuleResult<T> = Result<T, RuleFailure>;

/// Why a value was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleFailure {
    /// The value broke one or more rules; one message per broken rule
    #[error("{}", .messages.join("; "))]
    Validation { messages: Vec<String> },

    /// The rules themselves could not be run (unknown token, bad argument)
    #[error("Rule execution failed: {0}")]
    Unexpected(String),
}

impl RuleFailure {
    /// Validation failure with one message
    pub fn invalid(message: impl Into<String>) -> Self {
        RuleFailure::Validation {
            messages: vec![message.into()],
        }
    }

    pub fn unexpected(reason: impl Into<String>) -> Self {
        RuleFailure::Unexpected(reason.into())
    }

    /// Messages to report for the field
    pub fn messages(&self) -> Vec<String> {
        match self {
            RuleFailure::Validation { messages } => messages.clone(),
            RuleFailure::Unexpected(_) => vec![self.to_string()],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RuleFailure::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let failure = RuleFailure::Validation {
            messages: vec!["is required".into(), "must be a valid email address".into()],
        };
        assert_eq!(failure.to_string(), "is required; must be a valid email address");
        assert_eq!(failure.messages().len(), 2);
        assert!(failure.is_validation());
    }

    #[test]
    fn test_unexpected_messages() {
        let failure = RuleFailure::unexpected("unknown rule 'shout'");
        assert_eq!(failure.messages(), vec!["Rule execution failed: unknown rule 'shout'"]);
        assert!(!failure.is_validation());
    }
}
