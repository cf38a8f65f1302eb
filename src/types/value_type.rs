//! The `ValueType` trait implemented by every registry entry

use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

use super::errors::TypeResult;

/// A reusable value type (email, uuid, date, ...).
///
/// Implementations are immutable once constructed; options are merged at
/// construction time (defaults overridden by caller options).
pub trait ValueType: Send + Sync + fmt::Debug {
    /// Registry name, e.g. `"email"`
    fn name(&self) -> &str;

    /// Effective options after merging caller overrides into defaults
    fn options(&self) -> &Map<String, Value>;

    /// Fixed validation pattern, for pattern-backed types
    fn pattern(&self) -> Option<&Regex> {
        None
    }

    /// Whether the resolver may pick this type for untyped strings
    fn is_guessable(&self) -> bool {
        false
    }

    /// Returns true if `value` is acceptable for this type
    fn validate(&self, value: &Value) -> bool;

    /// Converts `value` into this type's canonical representation
    fn cast(&self, value: &Value) -> TypeResult<Value>;

    /// Property schema fragment describing this type
    fn schema_fragment(&self) -> Map<String, Value>;
}

/// Merges caller overrides into a type's default options.
pub fn merge_options(defaults: Value, overrides: Map<String, Value>) -> Map<String, Value> {
    let mut merged = match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in overrides {
        merged.insert(key, value);
    }
    merged
}

pub(crate) fn option_bool(options: &Map<String, Value>, key: &str, fallback: bool) -> bool {
    options.get(key).and_then(Value::as_bool).unwrap_or(fallback)
}

pub(crate) fn option_str<'a>(options: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Value::as_str)
}

pub(crate) fn option_strings(options: &Map<String, Value>, key: &str) -> Vec<String> {
    options
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overrides_defaults() {
        let overrides = json!({"trim": false, "extra": 1});
        let merged = merge_options(
            json!({"trim": true, "lowercase": true}),
            overrides.as_object().unwrap().clone(),
        );
        assert_eq!(merged["trim"], json!(false));
        assert_eq!(merged["lowercase"], json!(true));
        assert_eq!(merged["extra"], json!(1));
    }

    #[test]
    fn test_option_helpers() {
        let options = json!({"flag": true, "name": "x", "list": ["a", 1, "b"]});
        let options = options.as_object().unwrap();
        assert!(option_bool(options, "flag", false));
        assert!(option_bool(options, "missing", true));
        assert_eq!(option_str(options, "name"), Some("x"));
        assert_eq!(option_strings(options, "list"), vec!["a", "b"]);
    }
}
