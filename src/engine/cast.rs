//! Cast phase
//!
//! Null stays null. Blank strings become null for the non-string casts so
//! that an empty optional input does not fail coercion.

use serde_json::{Number, Value};

use super::errors::{RuleFailure, RuleResult};
use crate::patterns;

pub(super) type CastFn = fn(Value) -> RuleResult<Value>;

pub(super) const CASTS: &[(&str, CastFn)] = &[
    ("string", cast_string),
    ("integer", cast_integer),
    ("float", cast_float),
    ("boolean", cast_boolean),
];

pub(super) fn lookup(name: &str) -> Option<CastFn> {
    CASTS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

fn is_blank(value: &Value) -> bool {
    value.as_str().map_or(false, |s| s.trim().is_empty())
}

fn cast_string(value: Value) -> RuleResult<Value> {
    match value {
        Value::Null | Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(RuleFailure::invalid("must be a string")),
    }
}

fn cast_integer(value: Value) -> RuleResult<Value> {
    if value.is_null() || is_blank(&value) {
        return Ok(Value::Null);
    }
    let invalid = || RuleFailure::invalid("must be an integer");

    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
        Value::Number(n) => n
            .as_f64()
            .and_then(integral)
            .map(Value::from)
            .ok_or_else(invalid),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::from(i));
            }
            patterns::parse_number(trimmed)
                .and_then(integral)
                .map(Value::from)
                .ok_or_else(invalid)
        }
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        _ => Err(invalid()),
    }
}

/// `f` as an i64 if it has no fractional part and fits
fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn cast_float(value: Value) -> RuleResult<Value> {
    if value.is_null() || is_blank(&value) {
        return Ok(Value::Null);
    }
    let float = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => patterns::parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    float
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| RuleFailure::invalid("must be a number"))
}

fn cast_boolean(value: Value) -> RuleResult<Value> {
    if value.is_null() || is_blank(&value) {
        return Ok(Value::Null);
    }
    let invalid = || RuleFailure::invalid("must be true or false");

    match &value {
        Value::Bool(_) => Ok(value),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}
