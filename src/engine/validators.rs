//! Validate phase
//!
//! A validator returns `Ok(None)` when the value passes, `Ok(Some(message))`
//! when it does not, and `Err` when its own argument is unusable.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::net::IpAddr;

use super::date_format::DateFormat;
use super::errors::{RuleFailure, RuleResult};
use super::standard::Matchers;
use crate::patterns;

/// Failure message, if any
pub(super) type Check = Option<String>;

pub(super) type ValidatorFn = fn(&Matchers, &Value, Option<&str>) -> RuleResult<Check>;

pub(super) const VALIDATORS: &[(&str, ValidatorFn)] = &[
    ("required", required),
    ("min_length", min_length),
    ("max_length", max_length),
    ("email", email),
    ("url", url),
    ("date_format", date_format),
    ("regex", regex_match),
    ("hostname", hostname),
    ("ip", ip),
    ("uuid", uuid_string),
    ("base64", base64_string),
    ("json", json_string),
    ("string", string),
    ("in", in_list),
    ("int", int),
    ("numeric", numeric),
    ("gte", gte),
    ("lte", lte),
    ("gt", gt),
    ("lt", lt),
    ("multiple_of", multiple_of),
    ("min_items", min_items),
    ("max_items", max_items),
    ("unique", unique),
    ("file", file),
    ("image", image),
];

pub(super) fn lookup(name: &str) -> Option<ValidatorFn> {
    VALIDATORS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

// =============================================================================
// Helpers
// =============================================================================

fn check(passes: bool, message: impl FnOnce() -> String) -> Check {
    if passes {
        None
    } else {
        Some(message())
    }
}

fn arg<'a>(rule: &str, arg: Option<&'a str>) -> RuleResult<&'a str> {
    arg.ok_or_else(|| RuleFailure::unexpected(format!("rule '{}' needs an argument", rule)))
}

fn count_arg(rule: &str, raw: Option<&str>) -> RuleResult<usize> {
    let raw = arg(rule, raw)?;
    raw.trim().parse().map_err(|_| {
        RuleFailure::unexpected(format!("rule '{}' expects a count, got '{}'", rule, raw))
    })
}

fn number_arg(rule: &str, raw: Option<&str>) -> RuleResult<f64> {
    let raw = arg(rule, raw)?;
    patterns::parse_number(raw).ok_or_else(|| {
        RuleFailure::unexpected(format!("rule '{}' expects a number, got '{}'", rule, raw))
    })
}

/// Strings as-is, numbers and booleans rendered
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => patterns::parse_number(s),
        _ => None,
    }
}

fn string_matching(value: &Value, pattern: &Regex) -> bool {
    value.as_str().map_or(false, |s| pattern.is_match(s))
}

fn compare(
    rule: &str,
    value: &Value,
    raw: Option<&str>,
    holds: fn(f64, f64) -> bool,
    relation: &str,
) -> RuleResult<Check> {
    let shown = arg(rule, raw)?;
    let bound = number_arg(rule, raw)?;
    Ok(match number(value) {
        Some(n) => check(holds(n, bound), || format!("must be {} {}", relation, shown)),
        None => Some("must be a number".to_string()),
    })
}

// =============================================================================
// Presence and length
// =============================================================================

fn required(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let present = match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    };
    Ok(check(present, || "is required".to_string()))
}

fn min_length(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let min = count_arg("min_length", raw)?;
    Ok(text(value).and_then(|s| {
        check(s.chars().count() >= min, || {
            format!("must be at least {} characters", min)
        })
    }))
}

fn max_length(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let max = count_arg("max_length", raw)?;
    Ok(text(value).and_then(|s| {
        check(s.chars().count() <= max, || {
            format!("may not be greater than {} characters", max)
        })
    }))
}

// =============================================================================
// String formats
// =============================================================================

fn email(matchers: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(check(string_matching(value, &matchers.email), || {
        "must be a valid email address".to_string()
    }))
}

fn url(matchers: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(check(string_matching(value, &matchers.url), || {
        "must be a valid URL".to_string()
    }))
}

fn hostname(matchers: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = value
        .as_str()
        .map_or(false, |s| s.len() <= 253 && matchers.hostname.is_match(s));
    Ok(check(valid, || "must be a valid hostname".to_string()))
}

fn date_format(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let format = arg("date_format", raw)?;
    let parsed = DateFormat::translate(format)?;
    let valid = value.as_str().map_or(false, |s| parsed.matches(s));
    Ok(check(valid, || format!("does not match the format {}", format)))
}

fn regex_match(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let pattern = arg("regex", raw)?;
    let compiled = Regex::new(pattern)
        .map_err(|e| RuleFailure::unexpected(format!("invalid pattern '{}': {}", pattern, e)))?;
    let valid = text(value).map_or(false, |s| compiled.is_match(&s));
    Ok(check(valid, || "format is invalid".to_string()))
}

fn ip(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = value.as_str().map_or(false, |s| s.parse::<IpAddr>().is_ok());
    Ok(check(valid, || "must be a valid IP address".to_string()))
}

fn uuid_string(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = value
        .as_str()
        .map_or(false, |s| uuid::Uuid::parse_str(s).is_ok());
    Ok(check(valid, || "must be a valid UUID".to_string()))
}

fn base64_string(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = value.as_str().map_or(false, |s| STANDARD.decode(s).is_ok());
    Ok(check(valid, || "must be valid base64".to_string()))
}

fn json_string(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = value
        .as_str()
        .map_or(false, |s| serde_json::from_str::<Value>(s).is_ok());
    Ok(check(valid, || "must be a valid JSON string".to_string()))
}

fn string(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(check(value.is_string(), || "must be a string".to_string()))
}

fn in_list(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let members = list_members("in", arg("in", raw)?)?;
    let valid = match value {
        Value::Number(n) => n.as_f64().map_or(false, |n| {
            members.iter().any(|m| patterns::parse_number(m) == Some(n))
        }),
        other => text(other).map_or(false, |s| members.iter().any(|m| *m == s)),
    };
    Ok(check(valid, || format!("must be one of: {}", members.join(", "))))
}

/// Splits a CSV-quoted argument into its members.
fn list_members(rule: &str, list: &str) -> RuleResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(list.as_bytes());
    match reader.records().next() {
        Some(record) => {
            let record = record.map_err(|e| {
                RuleFailure::unexpected(format!("rule '{}' has a malformed list: {}", rule, e))
            })?;
            Ok(record.iter().map(str::to_string).collect())
        }
        None => Ok(Vec::new()),
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn int(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let valid = match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => patterns::is_digit_string(s),
        _ => false,
    };
    Ok(check(valid, || "must be an integer".to_string()))
}

fn numeric(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(check(number(value).is_some(), || "must be a number".to_string()))
}

fn gte(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    compare("gte", value, raw, |n, b| n >= b, "greater than or equal to")
}

fn lte(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    compare("lte", value, raw, |n, b| n <= b, "less than or equal to")
}

fn gt(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    compare("gt", value, raw, |n, b| n > b, "greater than")
}

fn lt(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    compare("lt", value, raw, |n, b| n < b, "less than")
}

fn multiple_of(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let shown = arg("multiple_of", raw)?;
    let step = number_arg("multiple_of", raw)?;
    if step <= 0.0 {
        return Err(RuleFailure::unexpected("rule 'multiple_of' needs a positive step"));
    }
    Ok(match number(value) {
        Some(n) => {
            let ratio = n / step;
            check((ratio - ratio.round()).abs() < 1e-9, || {
                format!("must be a multiple of {}", shown)
            })
        }
        None => Some("must be a number".to_string()),
    })
}

// =============================================================================
// Arrays
// =============================================================================

fn min_items(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let min = count_arg("min_items", raw)?;
    Ok(match value.as_array() {
        Some(items) => check(items.len() >= min, || format!("must have at least {} items", min)),
        None => Some("must be an array".to_string()),
    })
}

fn max_items(_: &Matchers, value: &Value, raw: Option<&str>) -> RuleResult<Check> {
    let max = count_arg("max_items", raw)?;
    Ok(match value.as_array() {
        Some(items) => check(items.len() <= max, || {
            format!("may not have more than {} items", max)
        }),
        None => Some("must be an array".to_string()),
    })
}

fn unique(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(match value.as_array() {
        Some(items) => {
            let mut seen = HashSet::with_capacity(items.len());
            let distinct = items.iter().all(|item| seen.insert(item.to_string()));
            check(distinct, || "must not contain duplicate items".to_string())
        }
        None => Some("must be an array".to_string()),
    })
}

// =============================================================================
// Uploads
// =============================================================================

/// An upload is an object with a `name` and a non-negative `size`
fn is_upload(value: &Value) -> bool {
    let has_name = value.get("name").map_or(false, Value::is_string);
    let has_size = value
        .get("size")
        .and_then(Value::as_f64)
        .map_or(false, |size| size >= 0.0);
    value.is_object() && has_name && has_size
}

fn file(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    Ok(check(is_upload(value), || "must be an uploaded file".to_string()))
}

fn image(_: &Matchers, value: &Value, _: Option<&str>) -> RuleResult<Check> {
    let mime = value
        .get("mime")
        .or_else(|| value.get("type"))
        .and_then(Value::as_str);
    let valid = is_upload(value) && mime.map_or(false, |m| m.starts_with("image/"));
    Ok(check(valid, || "must be an image".to_string()))
}
