//! Sanitize and transform phases
//!
//! Filters only touch strings; other values pass through unchanged.

use serde_json::Value;

use super::standard::Matchers;

pub(super) type FilterFn = fn(&Matchers, Value) -> Value;

pub(super) const FILTERS: &[(&str, FilterFn)] = &[
    ("trim", trim),
    ("lowercase", lowercase),
    ("strip_tags", strip_tags),
];

pub(super) fn lookup(name: &str) -> Option<FilterFn> {
    FILTERS.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

fn map_string(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn trim(_: &Matchers, value: Value) -> Value {
    map_string(value, |s| s.trim().to_string())
}

fn lowercase(_: &Matchers, value: Value) -> Value {
    map_string(value, str::to_lowercase)
}

fn strip_tags(matchers: &Matchers, value: Value) -> Value {
    map_string(value, |s| matchers.tags.replace_all(s, "").into_owned())
}
