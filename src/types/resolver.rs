//! Type resolver: guesses the best registered type for an untyped value
//!
//! Priority:
//! 1. Digit strings beyond `i64` resolve to text (lossless over lossy).
//! 2. Date/time values resolve to datetime.
//! 3. Everything else dispatches on shape; strings try each guessable type
//!    in registration order and fall back to text.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use serde_json::Value;
use std::sync::Arc;

use super::errors::{TypeError, TypeResult};
use super::registry::TypeRegistry;
use super::value_type::ValueType;
use super::{ARRAY, BOOLEAN, DATETIME, FLOAT, INTEGER, OBJECT, TEXT};
use crate::patterns;

/// A value submitted for type guessing
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    Json(&'a Value),
    DateTime(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl<'a> From<&'a Value> for RawValue<'a> {
    fn from(value: &'a Value) -> Self {
        RawValue::Json(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RawValue<'_> {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        RawValue::DateTime(value.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for RawValue<'_> {
    fn from(value: NaiveDateTime) -> Self {
        RawValue::NaiveDateTime(value)
    }
}

impl From<NaiveDate> for RawValue<'_> {
    fn from(value: NaiveDate) -> Self {
        RawValue::Date(value)
    }
}

impl From<NaiveTime> for RawValue<'_> {
    fn from(value: NaiveTime) -> Self {
        RawValue::Time(value)
    }
}

/// Guesses types against a shared, read-only registry.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    registry: Arc<TypeRegistry>,
}

impl TypeResolver {
    /// Creates a resolver over `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this resolver reads from
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Guess the type of a value.
    ///
    /// # Errors
    ///
    /// `CannotGuess` for null; `NotFound` if the registry lacks the type the
    /// value's shape maps to.
    pub fn guess<'v>(&self, value: impl Into<RawValue<'v>>) -> TypeResult<Arc<dyn ValueType>> {
        let json = match value.into() {
            RawValue::DateTime(_)
            | RawValue::NaiveDateTime(_)
            | RawValue::Date(_)
            | RawValue::Time(_) => return self.registry.get(DATETIME),
            RawValue::Json(json) => json,
        };

        match json {
            Value::String(s) if exceeds_native_integer(s) => self.registry.get(TEXT),
            Value::String(s) => self.guess_string_type(s),
            Value::Number(n) if n.is_i64() => self.registry.get(INTEGER),
            // Integral but wider than i64: keep it lossless as text.
            Value::Number(n) if n.is_u64() => self.registry.get(TEXT),
            Value::Number(_) => self.registry.get(FLOAT),
            Value::Bool(_) => self.registry.get(BOOLEAN),
            Value::Array(_) => self.registry.get(ARRAY),
            Value::Object(_) => self.registry.get(OBJECT),
            Value::Null => Err(TypeError::CannotGuess("null".into())),
        }
    }

    /// First guessable type accepting `value`, else the text type.
    pub fn guess_string_type(&self, value: &str) -> TypeResult<Arc<dyn ValueType>> {
        let candidate = Value::String(value.to_string());
        match self
            .registry
            .guessable_types()
            .iter()
            .find(|t| t.validate(&candidate))
        {
            Some(found) => Ok(Arc::clone(found)),
            None => self.registry.get(TEXT),
        }
    }
}

fn exceeds_native_integer(value: &str) -> bool {
    let trimmed = value.trim();
    patterns::is_digit_string(trimmed) && trimmed.parse::<i64>().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn resolver() -> TypeResolver {
        TypeResolver::new(Arc::new(TypeRegistry::with_defaults().unwrap()))
    }

    fn guessed(value: Value) -> String {
        resolver().guess(&value).unwrap().name().to_string()
    }

    #[test]
    fn test_huge_digit_string_is_text() {
        assert_eq!(guessed(json!("99999999999999999999999999")), "text");
        assert_eq!(guessed(json!("-99999999999999999999999999")), "text");
    }

    #[test]
    fn test_native_digit_string_is_integer() {
        assert_eq!(guessed(json!("9223372036854775807")), "integer");
        assert_eq!(guessed(json!("42")), "integer");
    }

    #[test]
    fn test_string_guesses() {
        assert_eq!(guessed(json!("john@example.com")), "email");
        assert_eq!(guessed(json!("https://example.com")), "url");
        assert_eq!(guessed(json!("67e55044-10b1-426f-9247-bb680e5fe0c8")), "uuid");
        assert_eq!(guessed(json!("2024-05-01")), "date");
        assert_eq!(guessed(json!("2024-05-01 12:00:00")), "datetime");
        assert_eq!(guessed(json!("12:00:00")), "time");
        assert_eq!(guessed(json!("10.0.0.1")), "ip");
        assert_eq!(guessed(json!("3.25")), "float");
        assert_eq!(guessed(json!("yes")), "boolean");
        assert_eq!(guessed(json!("hello world")), "text");
    }

    #[test]
    fn test_shape_dispatch() {
        assert_eq!(guessed(json!(7)), "integer");
        assert_eq!(guessed(json!(7.5)), "float");
        assert_eq!(guessed(json!(u64::MAX)), "text");
        assert_eq!(guessed(json!(true)), "boolean");
        assert_eq!(guessed(json!([1, 2])), "array");
        assert_eq!(guessed(json!({"a": 1})), "object");
    }

    #[test]
    fn test_null_cannot_be_guessed() {
        let err = resolver().guess(&Value::Null).unwrap_err();
        assert!(matches!(err, TypeError::CannotGuess(_)));
    }

    #[test]
    fn test_temporal_values_are_datetime() {
        let resolver = resolver();
        assert_eq!(resolver.guess(Utc::now()).unwrap().name(), "datetime");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(resolver.guess(date).unwrap().name(), "datetime");
        let time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(resolver.guess(time).unwrap().name(), "datetime");
    }

    #[test]
    fn test_registration_order_is_first_match() {
        use crate::types::builtin::{FloatType, IntegerType, TextType};

        let float_first = TypeRegistry::builder()
            .register(TextType::new())
            .unwrap()
            .register(FloatType::new())
            .unwrap()
            .register(IntegerType::new())
            .unwrap()
            .build();
        let resolver = TypeResolver::new(Arc::new(float_first));
        assert_eq!(resolver.guess_string_type("42").unwrap().name(), "float");
    }

    #[test]
    fn test_missing_fallback_is_not_found() {
        let resolver = TypeResolver::new(Arc::new(TypeRegistry::builder().build()));
        assert!(matches!(
            resolver.guess(&json!("plain")),
            Err(TypeError::NotFound(name)) if name == "text"
        ));
    }
}
