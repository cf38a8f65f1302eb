//! Standard rule engine
//!
//! Runs a rule set in phase order: cast, sanitize, transform, validate.
//! Every validator runs, so a rejected value reports all of its problems.
//! Validators other than `required` accept null and empty strings, which
//! keeps optional fields optional.

use regex::Regex;
use serde_json::Value;

use super::errors::{RuleFailure, RuleResult};
use super::{cast, filters, validators, RuleEngine};
use crate::patterns;
use crate::rules::{RuleSet, RuleToken};

/// Compiled built-in patterns
#[derive(Debug, Clone)]
pub(super) struct Matchers {
    pub(super) email: Regex,
    pub(super) url: Regex,
    pub(super) hostname: Regex,
    pub(super) tags: Regex,
}

impl Matchers {
    pub(super) fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(patterns::EMAIL)?,
            url: Regex::new(patterns::URL)?,
            hostname: Regex::new(patterns::HOSTNAME)?,
            tags: Regex::new(patterns::TAG)?,
        })
    }
}

/// Built-in implementation of every rule token the mapper emits
#[derive(Debug, Clone)]
pub struct StandardRuleEngine {
    matchers: Matchers,
}

impl StandardRuleEngine {
    pub fn new() -> RuleResult<Self> {
        let matchers = Matchers::compile().map_err(|e| {
            RuleFailure::unexpected(format!("built-in pattern failed to compile: {}", e))
        })?;
        Ok(Self { matchers })
    }

    fn cast(&self, token: &RuleToken, value: Value) -> RuleResult<Value> {
        let cast = cast::lookup(token.name()).ok_or_else(|| unknown("cast", token))?;
        cast(value)
    }

    fn filter(&self, phase: &str, token: &RuleToken, value: Value) -> RuleResult<Value> {
        let filter = filters::lookup(token.name()).ok_or_else(|| unknown(phase, token))?;
        Ok(filter(&self.matchers, value))
    }

    fn validate(&self, token: &RuleToken, value: &Value) -> RuleResult<Option<String>> {
        let validator = validators::lookup(token.name()).ok_or_else(|| unknown("validate", token))?;
        if token.name() != "required" && is_empty_input(value) {
            return Ok(None);
        }
        validator(&self.matchers, value, token.arg())
    }
}

impl RuleEngine for StandardRuleEngine {
    fn process(&self, value: &Value, rules: &RuleSet) -> RuleResult<Value> {
        let mut value = value.clone();

        if let Some(token) = &rules.cast {
            value = self.cast(token, value)?;
        }
        for token in &rules.sanitize {
            value = self.filter("sanitize", token, value)?;
        }
        for token in &rules.transform {
            value = self.filter("transform", token, value)?;
        }

        let mut messages = Vec::new();
        for token in &rules.validate {
            if let Some(message) = self.validate(token, &value)? {
                messages.push(message);
            }
        }

        if messages.is_empty() {
            Ok(value)
        } else {
            Err(RuleFailure::Validation { messages })
        }
    }
}

fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn unknown(phase: &str, token: &RuleToken) -> RuleFailure {
    RuleFailure::unexpected(format!("unknown {} rule '{}'", phase, token.name()))
}
