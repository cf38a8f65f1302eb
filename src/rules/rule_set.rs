//! Rule tokens and four-phase rule sets
//!
//! A token is a string instruction, optionally parametrized after the first
//! `:` (`"min_length:3"`, `"regex:^a:b$"`). Token strings are the contract
//! with the rule engine and serialize verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One processing instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RuleToken {
    name: String,
    arg: Option<String>,
}

impl RuleToken {
    /// Token without an argument
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
        }
    }

    /// Token with an argument, rendered as `name:arg`
    pub fn with_arg(name: impl Into<String>, arg: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            arg: Some(arg.to_string()),
        }
    }

    /// Splits at the first `:`; the argument may itself contain colons.
    pub fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((name, arg)) => Self::with_arg(name, arg),
            None => Self::new(token),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}:{}", self.name, arg),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<String> for RuleToken {
    fn from(token: String) -> Self {
        RuleToken::parse(&token)
    }
}

impl From<&str> for RuleToken {
    fn from(token: &str) -> Self {
        RuleToken::parse(token)
    }
}

impl From<RuleToken> for String {
    fn from(token: RuleToken) -> Self {
        token.to_string()
    }
}

/// Processing phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Cast,
    Sanitize,
    Transform,
    Validate,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Cast => "cast",
            Phase::Sanitize => "sanitize",
            Phase::Transform => "transform",
            Phase::Validate => "validate",
        }
    }
}

/// Compiled rules for one field.
///
/// Empty phases are absent when serialized: an array field's rule set has
/// no `cast` key at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<RuleToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sanitize: Vec<RuleToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<RuleToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validate: Vec<RuleToken>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token to a list phase; a cast token replaces the cast.
    pub fn push(&mut self, phase: Phase, token: RuleToken) {
        match phase {
            Phase::Cast => self.cast = Some(token),
            Phase::Sanitize => self.sanitize.push(token),
            Phase::Transform => self.transform.push(token),
            Phase::Validate => self.validate.push(token),
        }
    }

    /// Appends unless a token with the same text is already in the phase.
    pub fn push_unique(&mut self, phase: Phase, token: RuleToken) {
        if !self.tokens(phase).contains(&token) {
            self.push(phase, token);
        }
    }

    /// Tokens of one phase
    pub fn tokens(&self, phase: Phase) -> &[RuleToken] {
        match phase {
            Phase::Cast => match &self.cast {
                Some(token) => std::slice::from_ref(token),
                None => &[],
            },
            Phase::Sanitize => &self.sanitize,
            Phase::Transform => &self.transform,
            Phase::Validate => &self.validate,
        }
    }

    /// Additive merge: list phases are concatenated, never replaced.
    /// `other`'s cast only fills an absent cast.
    pub fn merge(&mut self, other: RuleSet) {
        if self.cast.is_none() {
            self.cast = other.cast;
        }
        self.sanitize.extend(other.sanitize);
        self.transform.extend(other.transform);
        self.validate.extend(other.validate);
    }

    /// Returns true if a validate token has this name
    pub fn has_validator(&self, name: &str) -> bool {
        self.validate.iter().any(|t| t.name() == name)
    }

    /// Validate token names in order
    pub fn validator_names(&self) -> Vec<&str> {
        self.validate.iter().map(RuleToken::name).collect()
    }

    /// Returns true if no phase holds a token
    pub fn is_empty(&self) -> bool {
        self.cast.is_none()
            && self.sanitize.is_empty()
            && self.transform.is_empty()
            && self.validate.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_parse_splits_first_colon() {
        let token = RuleToken::parse("regex:^\\d{2}:\\d{2}$");
        assert_eq!(token.name(), "regex");
        assert_eq!(token.arg(), Some("^\\d{2}:\\d{2}$"));
        assert_eq!(token.to_string(), "regex:^\\d{2}:\\d{2}$");

        let bare = RuleToken::parse("trim");
        assert_eq!(bare.name(), "trim");
        assert_eq!(bare.arg(), None);
    }

    #[test]
    fn test_token_with_arg_display() {
        assert_eq!(RuleToken::with_arg("min_length", 3).to_string(), "min_length:3");
        assert_eq!(RuleToken::with_arg("in", "a,b").to_string(), "in:a,b");
    }

    #[test]
    fn test_serialize_skips_empty_phases() {
        let mut rules = RuleSet::new();
        rules.push(Phase::Validate, RuleToken::with_arg("min_items", 1));

        let value = serde_json::to_value(&rules).unwrap();
        assert_eq!(value, json!({"validate": ["min_items:1"]}));
        assert!(value.get("cast").is_none());
    }

    #[test]
    fn test_deserialize_tokens() {
        let rules: RuleSet = serde_json::from_value(json!({
            "cast": "string",
            "sanitize": ["trim"],
            "validate": ["email", "max_length:10"]
        }))
        .unwrap();

        assert_eq!(rules.cast, Some(RuleToken::new("string")));
        assert!(rules.transform.is_empty());
        assert_eq!(rules.validator_names(), vec!["email", "max_length"]);
        assert_eq!(rules.validate[1].arg(), Some("10"));
    }

    #[test]
    fn test_merge_is_additive() {
        let mut base = RuleSet::new();
        base.push(Phase::Cast, RuleToken::new("string"));
        base.push(Phase::Validate, RuleToken::new("required"));

        let mut extra = RuleSet::new();
        extra.push(Phase::Cast, RuleToken::new("integer"));
        extra.push(Phase::Validate, RuleToken::new("required"));
        extra.push(Phase::Transform, RuleToken::new("strip_tags"));

        base.merge(extra);
        assert_eq!(base.cast, Some(RuleToken::new("string")));
        assert_eq!(base.validator_names(), vec!["required", "required"]);
        assert_eq!(base.tokens(Phase::Transform), &[RuleToken::new("strip_tags")]);
    }

    #[test]
    fn test_push_unique() {
        let mut rules = RuleSet::new();
        rules.push_unique(Phase::Transform, RuleToken::new("lowercase"));
        rules.push_unique(Phase::Transform, RuleToken::new("lowercase"));
        assert_eq!(rules.transform.len(), 1);
        assert!(!rules.is_empty());
        assert!(RuleSet::new().is_empty());
    }
}
