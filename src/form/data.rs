//! Form data values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{FormError, FormResult};

/// Field values of a form, keyed by property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data {
    values: Map<String, Value>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Accepts an object; null yields empty data.
    pub fn from_value(value: &Value) -> FormResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map.clone())),
            Value::Null => Ok(Self::new()),
            other => Err(FormError::MalformedData(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<Map<String, Value>> for Data {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
