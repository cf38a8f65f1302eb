//! formwork configuration
//!
//! Read once at setup; every component takes what it needs by reference.

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::observability::{Logger, Severity};
use crate::patterns;
use crate::schema::DEFAULT_MAX_NODES;

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Malformed configuration: {0}")]
    Parse(String),

    #[error("max_schema_depth must be at least 1")]
    ZeroDepth,

    #[error("max_schema_nodes must be at least 1")]
    ZeroNodeBudget,

    #[error("Invalid phone pattern: {0}")]
    InvalidPhonePattern(String),

    #[error("Rule engine could not be initialized: {0}")]
    Engine(String),
}

/// Configuration for schema loading and form processing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormworkConfig {
    /// Nesting bound for schema and UI schema trees.
    pub max_schema_depth: usize,
    /// Node budget for one expanded schema document, `$ref` copies included.
    pub max_schema_nodes: usize,
    /// Pattern emitted as `regex:<pattern>` for `format: tel`.
    pub phone_pattern: String,
    /// Minimum severity written by the processor's logger.
    pub log_level: Severity,
}

impl Default for FormworkConfig {
    fn default() -> Self {
        Self {
            max_schema_depth: 32,
            max_schema_nodes: DEFAULT_MAX_NODES,
            phone_pattern: patterns::PHONE.to_string(),
            log_level: Severity::Warn,
        }
    }
}

impl FormworkConfig {
    /// Default configuration logging everything
    pub fn verbose() -> Self {
        Self {
            log_level: Severity::Trace,
            ..Self::default()
        }
    }

    /// Default configuration logging only fatal events
    pub fn quiet() -> Self {
        Self {
            log_level: Severity::Fatal,
            ..Self::default()
        }
    }

    pub fn with_max_schema_depth(mut self, depth: usize) -> Self {
        self.max_schema_depth = depth;
        self
    }

    pub fn with_max_schema_nodes(mut self, nodes: usize) -> Self {
        self.max_schema_nodes = nodes;
        self
    }

    pub fn with_phone_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.phone_pattern = pattern.into();
        self
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_schema_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.max_schema_nodes == 0 {
            return Err(ConfigError::ZeroNodeBudget);
        }
        Regex::new(&self.phone_pattern)
            .map_err(|e| ConfigError::InvalidPhonePattern(e.to_string()))?;
        Ok(())
    }

    /// Logger at the configured level
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level)
    }
}
