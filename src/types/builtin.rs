//! Built-in value types
//!
//! Every type carries merged options; constructors taking `overrides` merge
//! them over the type's defaults.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{json, Map, Number, Value};
use std::net::IpAddr;

use super::errors::{TypeError, TypeResult};
use super::value_type::{merge_options, option_bool, option_str, option_strings, ValueType};
use super::{
    ARRAY, BOOLEAN, DATE, DATETIME, EMAIL, FLOAT, HOSTNAME, INTEGER, IP, OBJECT, TEXT, TIME, URL,
    UUID,
};
use crate::patterns;

fn compile(type_name: &str, pattern: &str) -> TypeResult<Regex> {
    Regex::new(pattern).map_err(|e| TypeError::InvalidPattern {
        type_name: type_name.to_string(),
        reason: e.to_string(),
    })
}

fn fragment(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Text
// =============================================================================

/// Generic text; the resolver's fallback for strings nothing else claims.
#[derive(Debug, Clone)]
pub struct TextType {
    options: Map<String, Value>,
}

impl TextType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"trim": false}), overrides),
        }
    }
}

impl Default for TextType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for TextType {
    fn name(&self) -> &str {
        TEXT
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => return Err(TypeError::cast(TEXT, format!("{} is not text", describe(other)))),
        };
        if option_bool(&self.options, "trim", false) {
            Ok(Value::String(text.trim().to_string()))
        } else {
            Ok(Value::String(text))
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string"}))
    }
}

// =============================================================================
// Pattern-backed string types
// =============================================================================

/// Email address; lowercased on cast unless `lowercase` is false.
#[derive(Debug, Clone)]
pub struct EmailType {
    options: Map<String, Value>,
    regex: Regex,
}

impl EmailType {
    pub fn new() -> TypeResult<Self> {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> TypeResult<Self> {
        Ok(Self {
            options: merge_options(json!({"lowercase": true}), overrides),
            regex: compile(EMAIL, patterns::EMAIL)?,
        })
    }
}

impl ValueType for EmailType {
    fn name(&self) -> &str {
        EMAIL
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn pattern(&self) -> Option<&Regex> {
        Some(&self.regex)
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().map_or(false, |s| self.regex.is_match(s.trim()))
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        if !self.validate(value) {
            return Err(TypeError::cast(EMAIL, "not a valid email address"));
        }
        let trimmed = value.as_str().unwrap_or_default().trim();
        if option_bool(&self.options, "lowercase", true) {
            Ok(Value::String(trimmed.to_lowercase()))
        } else {
            Ok(Value::String(trimmed.to_string()))
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "email"}))
    }
}

/// Absolute URL whose scheme is in the `schemes` option.
#[derive(Debug, Clone)]
pub struct UrlType {
    options: Map<String, Value>,
    regex: Regex,
}

impl UrlType {
    pub fn new() -> TypeResult<Self> {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> TypeResult<Self> {
        Ok(Self {
            options: merge_options(json!({"schemes": ["http", "https", "ftp"]}), overrides),
            regex: compile(URL, patterns::URL)?,
        })
    }
}

impl ValueType for UrlType {
    fn name(&self) -> &str {
        URL
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn pattern(&self) -> Option<&Regex> {
        Some(&self.regex)
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        let Some(text) = value.as_str() else {
            return false;
        };
        let Some(captures) = self.regex.captures(text.trim()) else {
            return false;
        };
        let scheme = captures.name("scheme").map_or("", |m| m.as_str());
        let allowed = option_strings(&self.options, "schemes");
        allowed.is_empty() || allowed.iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        if !self.validate(value) {
            return Err(TypeError::cast(URL, "not a valid URL"));
        }
        Ok(Value::String(value.as_str().unwrap_or_default().trim().to_string()))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "uri"}))
    }
}

/// DNS hostname. Not guessable: almost any word is a hostname.
#[derive(Debug, Clone)]
pub struct HostnameType {
    options: Map<String, Value>,
    regex: Regex,
}

impl HostnameType {
    pub fn new() -> TypeResult<Self> {
        Ok(Self {
            options: Map::new(),
            regex: compile(HOSTNAME, patterns::HOSTNAME)?,
        })
    }
}

impl ValueType for HostnameType {
    fn name(&self) -> &str {
        HOSTNAME
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn pattern(&self) -> Option<&Regex> {
        Some(&self.regex)
    }

    fn validate(&self, value: &Value) -> bool {
        value
            .as_str()
            .map_or(false, |s| s.len() <= 253 && self.regex.is_match(s))
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        if !self.validate(value) {
            return Err(TypeError::cast(HOSTNAME, "not a valid hostname"));
        }
        Ok(Value::String(value.as_str().unwrap_or_default().to_lowercase()))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "hostname"}))
    }
}

/// Caller-defined string type backed by one regular expression.
#[derive(Debug, Clone)]
pub struct PatternType {
    name: String,
    options: Map<String, Value>,
    regex: Regex,
    guessable: bool,
}

impl PatternType {
    pub fn new(name: impl Into<String>, pattern: &str) -> TypeResult<Self> {
        let name = name.into();
        let regex = compile(&name, pattern)?;
        Ok(Self {
            name,
            options: Map::new(),
            regex,
            guessable: false,
        })
    }

    /// Makes the type eligible for guessing
    pub fn guessable(mut self, guessable: bool) -> Self {
        self.guessable = guessable;
        self
    }

    pub fn with_options(mut self, overrides: Map<String, Value>) -> Self {
        self.options = merge_options(Value::Object(self.options), overrides);
        self
    }
}

impl ValueType for PatternType {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn pattern(&self) -> Option<&Regex> {
        Some(&self.regex)
    }

    fn is_guessable(&self) -> bool {
        self.guessable
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().map_or(false, |s| self.regex.is_match(s))
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        if !self.validate(value) {
            return Err(TypeError::cast(&self.name, "value does not match pattern"));
        }
        Ok(value.clone())
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "pattern": self.regex.as_str()}))
    }
}

// =============================================================================
// Identifiers and addresses
// =============================================================================

/// UUID in any textual form; cast to lowercase hyphenated.
#[derive(Debug, Clone)]
pub struct UuidType {
    options: Map<String, Value>,
}

impl UuidType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    /// `version` restricts accepted UUIDs to one version number
    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"version": null}), overrides),
        }
    }

    fn parse(&self, value: &Value) -> Option<uuid::Uuid> {
        let parsed = uuid::Uuid::parse_str(value.as_str()?.trim()).ok()?;
        match self.options.get("version").and_then(Value::as_u64) {
            Some(version) if parsed.get_version_num() as u64 != version => None,
            _ => Some(parsed),
        }
    }
}

impl Default for UuidType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for UuidType {
    fn name(&self) -> &str {
        UUID
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        self.parse(value)
            .map(|id| Value::String(id.hyphenated().to_string()))
            .ok_or_else(|| TypeError::cast(UUID, "not a valid UUID"))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "uuid"}))
    }
}

/// IPv4 or IPv6 address; `version` is `"any"`, `"4"` or `"6"`.
#[derive(Debug, Clone)]
pub struct IpType {
    options: Map<String, Value>,
}

impl IpType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"version": "any"}), overrides),
        }
    }

    fn parse(&self, value: &Value) -> Option<IpAddr> {
        let addr: IpAddr = value.as_str()?.trim().parse().ok()?;
        match (option_str(&self.options, "version"), addr) {
            (Some("4"), IpAddr::V6(_)) | (Some("6"), IpAddr::V4(_)) => None,
            _ => Some(addr),
        }
    }
}

impl Default for IpType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for IpType {
    fn name(&self) -> &str {
        IP
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        self.parse(value)
            .map(|addr| Value::String(addr.to_string()))
            .ok_or_else(|| TypeError::cast(IP, "not a valid IP address"))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        match option_str(&self.options, "version") {
            Some("4") => fragment(json!({"type": "string", "format": "ipv4"})),
            Some("6") => fragment(json!({"type": "string", "format": "ipv6"})),
            _ => fragment(json!({
                "type": "string",
                "anyOf": [{"format": "ipv4"}, {"format": "ipv6"}]
            })),
        }
    }
}

// =============================================================================
// Temporal
// =============================================================================

/// Calendar date in the `format` option (chrono syntax).
#[derive(Debug, Clone)]
pub struct DateType {
    options: Map<String, Value>,
}

impl DateType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"format": "%Y-%m-%d"}), overrides),
        }
    }

    fn format(&self) -> &str {
        option_str(&self.options, "format").unwrap_or("%Y-%m-%d")
    }

    fn parse(&self, value: &Value) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.as_str()?.trim(), self.format()).ok()
    }
}

impl Default for DateType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for DateType {
    fn name(&self) -> &str {
        DATE
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        self.parse(value)
            .map(|date| Value::String(date.format(self.format()).to_string()))
            .ok_or_else(|| {
                TypeError::cast(DATE, format!("expected a date in format {}", self.format()))
            })
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "date"}))
    }
}

/// Date and time: RFC 3339, or naive in the `format` option.
#[derive(Debug, Clone)]
pub struct DateTimeType {
    options: Map<String, Value>,
}

enum ParsedDateTime {
    Zoned(DateTime<chrono::FixedOffset>),
    Naive(NaiveDateTime),
}

impl DateTimeType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"format": "%Y-%m-%d %H:%M:%S"}), overrides),
        }
    }

    fn format(&self) -> &str {
        option_str(&self.options, "format").unwrap_or("%Y-%m-%d %H:%M:%S")
    }

    fn parse(&self, value: &Value) -> Option<ParsedDateTime> {
        let text = value.as_str()?.trim();
        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Some(ParsedDateTime::Zoned(zoned));
        }
        NaiveDateTime::parse_from_str(text, self.format())
            .ok()
            .map(ParsedDateTime::Naive)
    }
}

impl Default for DateTimeType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for DateTimeType {
    fn name(&self) -> &str {
        DATETIME
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        match self.parse(value) {
            Some(ParsedDateTime::Zoned(dt)) => Ok(Value::String(dt.to_rfc3339())),
            Some(ParsedDateTime::Naive(dt)) => {
                Ok(Value::String(dt.format(self.format()).to_string()))
            }
            None => Err(TypeError::cast(DATETIME, "not a valid date-time")),
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "date-time"}))
    }
}

/// Time of day in the `format` option; `HH:MM` is also accepted.
#[derive(Debug, Clone)]
pub struct TimeType {
    options: Map<String, Value>,
}

impl TimeType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"format": "%H:%M:%S"}), overrides),
        }
    }

    fn format(&self) -> &str {
        option_str(&self.options, "format").unwrap_or("%H:%M:%S")
    }

    fn parse(&self, value: &Value) -> Option<NaiveTime> {
        let text = value.as_str()?.trim();
        NaiveTime::parse_from_str(text, self.format())
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .ok()
    }
}

impl Default for TimeType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for TimeType {
    fn name(&self) -> &str {
        TIME
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        self.parse(value)
            .map(|time| Value::String(time.format(self.format()).to_string()))
            .ok_or_else(|| TypeError::cast(TIME, "not a valid time"))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "string", "format": "time"}))
    }
}

// =============================================================================
// Scalars
// =============================================================================

/// 64-bit signed integer. Digit strings outside `i64` are rejected.
#[derive(Debug, Clone, Default)]
pub struct IntegerType {
    options: Map<String, Value>,
}

impl IntegerType {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueType for IntegerType {
    fn name(&self) -> &str {
        INTEGER
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => n.is_i64(),
            Value::String(s) => {
                patterns::is_digit_string(s.trim()) && s.trim().parse::<i64>().is_ok()
            }
            _ => false,
        }
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        match value {
            Value::Number(n) if n.is_i64() => Ok(value.clone()),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(Value::Number((f as i64).into()))
                }
                _ => Err(TypeError::cast(INTEGER, format!("{} is not an integer", n))),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| Value::Number(i.into()))
                .map_err(|e| TypeError::cast(INTEGER, e.to_string())),
            Value::Bool(b) => Ok(Value::Number(i64::from(*b).into())),
            other => Err(TypeError::cast(
                INTEGER,
                format!("{} is not an integer", describe(other)),
            )),
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "integer"}))
    }
}

/// Finite floating-point number; `precision` rounds on cast.
#[derive(Debug, Clone)]
pub struct FloatType {
    options: Map<String, Value>,
}

impl FloatType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"precision": null}), overrides),
        }
    }
}

impl Default for FloatType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for FloatType {
    fn name(&self) -> &str {
        FLOAT
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Number(_) => true,
            Value::String(s) => patterns::parse_number(s).is_some(),
            _ => false,
        }
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => patterns::parse_number(s),
            _ => None,
        }
        .ok_or_else(|| TypeError::cast(FLOAT, format!("{} is not a number", describe(value))))?;

        let number = match self.options.get("precision").and_then(Value::as_u64) {
            Some(places) => {
                let factor = 10f64.powi(places.min(15) as i32);
                (number * factor).round() / factor
            }
            None => number,
        };

        Number::from_f64(number)
            .map(Value::Number)
            .ok_or_else(|| TypeError::cast(FLOAT, "number is not finite"))
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "number"}))
    }
}

/// Boolean, accepting the textual spellings in `true_values` / `false_values`.
#[derive(Debug, Clone)]
pub struct BooleanType {
    options: Map<String, Value>,
}

impl BooleanType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(
                json!({
                    "true_values": ["true", "yes", "on"],
                    "false_values": ["false", "no", "off"]
                }),
                overrides,
            ),
        }
    }

    fn parse(&self, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => {
                let needle = s.trim().to_lowercase();
                if option_strings(&self.options, "true_values").contains(&needle) {
                    Some(true)
                } else if option_strings(&self.options, "false_values").contains(&needle) {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Default for BooleanType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for BooleanType {
    fn name(&self) -> &str {
        BOOLEAN
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn is_guessable(&self) -> bool {
        true
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_some()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        self.parse(value)
            .map(Value::Bool)
            .ok_or_else(|| {
                TypeError::cast(BOOLEAN, format!("{} is not a boolean", describe(value)))
            })
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "boolean"}))
    }
}

// =============================================================================
// Structured
// =============================================================================

/// Sequence; scalars are wrapped on cast when `wrap_scalars` is set.
#[derive(Debug, Clone)]
pub struct ArrayType {
    options: Map<String, Value>,
}

impl ArrayType {
    pub fn new() -> Self {
        Self::with_options(Map::new())
    }

    pub fn with_options(overrides: Map<String, Value>) -> Self {
        Self {
            options: merge_options(json!({"wrap_scalars": true}), overrides),
        }
    }
}

impl Default for ArrayType {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueType for ArrayType {
    fn name(&self) -> &str {
        ARRAY
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        match value {
            Value::Array(_) => Ok(value.clone()),
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Object(_) => Err(TypeError::cast(ARRAY, "object is not a list")),
            scalar if option_bool(&self.options, "wrap_scalars", true) => {
                Ok(Value::Array(vec![scalar.clone()]))
            }
            other => Err(TypeError::cast(ARRAY, format!("{} is not a list", describe(other)))),
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "array"}))
    }
}

/// Structured map value
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    options: Map<String, Value>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueType for ObjectType {
    fn name(&self) -> &str {
        OBJECT
    }

    fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn cast(&self, value: &Value) -> TypeResult<Value> {
        match value {
            Value::Object(_) => Ok(value.clone()),
            Value::Null => Ok(Value::Object(Map::new())),
            other => Err(TypeError::cast(OBJECT, format!("{} is not an object", describe(other)))),
        }
    }

    fn schema_fragment(&self) -> Map<String, Value> {
        fragment(json!({"type": "object"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_text_cast() {
        let text = TextType::new();
        assert_eq!(text.cast(&json!(12)).unwrap(), json!("12"));
        assert_eq!(text.cast(&json!(" a ")).unwrap(), json!(" a "));
        assert!(text.cast(&json!([1])).is_err());

        let trimming = TextType::with_options(overrides(json!({"trim": true})));
        assert_eq!(trimming.cast(&json!(" a ")).unwrap(), json!("a"));
    }

    #[test]
    fn test_email() {
        let email = EmailType::new().unwrap();
        assert!(email.validate(&json!("john@example.com")));
        assert!(!email.validate(&json!("john@")));
        assert!(!email.validate(&json!(5)));
        assert_eq!(email.cast(&json!(" John@Example.COM ")).unwrap(), json!("john@example.com"));
        assert!(email.pattern().is_some());
        assert_eq!(email.schema_fragment()["format"], json!("email"));
    }

    #[test]
    fn test_url_schemes() {
        let url = UrlType::new().unwrap();
        assert!(url.validate(&json!("https://example.com/path?q=1")));
        assert!(!url.validate(&json!("example.com")));
        assert!(!url.validate(&json!("gopher://example.com")));

        let gopher = UrlType::with_options(overrides(json!({"schemes": ["gopher"]}))).unwrap();
        assert!(gopher.validate(&json!("gopher://example.com")));
        assert_eq!(gopher.options()["schemes"], json!(["gopher"]));
    }

    #[test]
    fn test_uuid() {
        let uuid_type = UuidType::new();
        let id = "67E55044-10B1-426F-9247-BB680E5FE0C8";
        assert!(uuid_type.validate(&json!(id)));
        assert_eq!(
            uuid_type.cast(&json!(id)).unwrap(),
            json!("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert!(!uuid_type.validate(&json!("not-a-uuid")));

        let v1_only = UuidType::with_options(overrides(json!({"version": 1})));
        assert!(!v1_only.validate(&json!(id)));
    }

    #[test]
    fn test_ip_versions() {
        let any = IpType::new();
        assert!(any.validate(&json!("192.168.0.1")));
        assert!(any.validate(&json!("::1")));
        assert!(!any.validate(&json!("999.1.1.1")));

        let v4 = IpType::with_options(overrides(json!({"version": "4"})));
        assert!(!v4.validate(&json!("::1")));
        assert_eq!(v4.schema_fragment()["format"], json!("ipv4"));
    }

    #[test]
    fn test_temporal_types() {
        let date = DateType::new();
        assert!(date.validate(&json!("2024-02-29")));
        assert!(!date.validate(&json!("2023-02-29")));

        let datetime = DateTimeType::new();
        assert!(datetime.validate(&json!("2024-01-01 10:30:00")));
        assert!(datetime.validate(&json!("2024-01-01T10:30:00+02:00")));
        assert!(!datetime.validate(&json!("2024-01-01")));

        let time = TimeType::new();
        assert!(time.validate(&json!("23:59:59")));
        assert_eq!(time.cast(&json!("08:15")).unwrap(), json!("08:15:00"));
        assert!(!time.validate(&json!("25:00")));
    }

    #[test]
    fn test_integer() {
        let integer = IntegerType::new();
        assert!(integer.validate(&json!("42")));
        assert!(integer.validate(&json!(-7)));
        assert!(!integer.validate(&json!("4.2")));
        assert!(!integer.validate(&json!("99999999999999999999999999")));
        assert_eq!(integer.cast(&json!(" 25 ")).unwrap(), json!(25));
        assert_eq!(integer.cast(&json!(3.0)).unwrap(), json!(3));
        assert!(integer.cast(&json!(3.5)).is_err());
        assert!(integer.cast(&json!("99999999999999999999999999")).is_err());
    }

    #[test]
    fn test_float_precision() {
        let float = FloatType::with_options(overrides(json!({"precision": 2})));
        assert_eq!(float.cast(&json!("3.14159")).unwrap(), json!(3.14));
        assert!(float.cast(&json!("abc")).is_err());
        assert!(FloatType::new().validate(&json!("1e3")));
    }

    #[test]
    fn test_boolean_spellings() {
        let boolean = BooleanType::new();
        assert_eq!(boolean.cast(&json!("Yes")).unwrap(), json!(true));
        assert_eq!(boolean.cast(&json!("off")).unwrap(), json!(false));
        assert!(!boolean.validate(&json!("maybe")));
    }

    #[test]
    fn test_structured_casts() {
        let array = ArrayType::new();
        assert_eq!(array.cast(&json!("a")).unwrap(), json!(["a"]));
        assert_eq!(array.cast(&Value::Null).unwrap(), json!([]));

        let strict = ArrayType::with_options(overrides(json!({"wrap_scalars": false})));
        assert!(strict.cast(&json!("a")).is_err());

        let object = ObjectType::new();
        assert!(object.validate(&json!({"a": 1})));
        assert!(object.cast(&json!(1)).is_err());
    }

    #[test]
    fn test_pattern_type() {
        let zip = PatternType::new("zip", "^[0-9]{5}$").unwrap().guessable(true);
        assert_eq!(zip.name(), "zip");
        assert!(zip.is_guessable());
        assert!(zip.validate(&json!("12345")));
        assert!(zip.cast(&json!("1234")).is_err());
        assert_eq!(zip.schema_fragment()["pattern"], json!("^[0-9]{5}$"));

        assert!(matches!(
            PatternType::new("bad", "(["),
            Err(TypeError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_hostname_not_guessable() {
        let hostname = HostnameType::new().unwrap();
        assert!(hostname.validate(&json!("api.example.com")));
        assert!(!hostname.validate(&json!("bad host")));
        assert!(!hostname.is_guessable());
    }
}
