//! Root form schema
//!
//! The root of a form is an object schema. Besides its properties it owns the
//! form-level `required` list and the named definitions `$ref`s resolve to.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::loader::{SchemaLoader, DEFAULT_MAX_NODES};
use super::types::{ObjectConstraints, PropertySchema, SchemaKind};

/// Root schema of a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    root: PropertySchema,
    definitions: BTreeMap<String, PropertySchema>,
}

impl FormSchema {
    /// Creates a form schema from an object root and parsed definitions.
    pub fn new(
        root: PropertySchema,
        definitions: BTreeMap<String, PropertySchema>,
    ) -> SchemaResult<Self> {
        if root.as_object().is_none() {
            return Err(SchemaError::malformed(
                "#",
                format!("form root must be an object schema, got '{}'", root.kind_tag()),
            ));
        }
        Ok(Self { root, definitions })
    }

    /// Loads a form schema document with the default node budget.
    ///
    /// Definitions come from `definitions` or `$defs` (both are merged, with
    /// `$defs` winning on name clashes).
    pub fn from_value(value: &Value, max_depth: usize) -> SchemaResult<Self> {
        Self::from_value_with_budget(value, max_depth, DEFAULT_MAX_NODES)
    }

    /// Loads a form schema document.
    ///
    /// Definitions and the root are loaded through one loader, so `max_nodes`
    /// bounds the whole expanded document.
    pub fn from_value_with_budget(
        value: &Value,
        max_depth: usize,
        max_nodes: usize,
    ) -> SchemaResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed("#", "form schema must be an object"))?;

        let mut raw_definitions = Map::new();
        for key in ["definitions", "$defs"] {
            if let Some(defs) = map.get(key) {
                let defs = defs.as_object().ok_or_else(|| {
                    SchemaError::malformed("#", format!("'{}' must be an object", key))
                })?;
                for (name, def) in defs {
                    raw_definitions.insert(name.clone(), def.clone());
                }
            }
        }

        let mut loader =
            SchemaLoader::new(&raw_definitions, max_depth).with_max_nodes(max_nodes);

        let mut definitions = BTreeMap::new();
        for (name, def) in &raw_definitions {
            let path = format!("#/definitions/{}", name);
            definitions.insert(name.clone(), loader.load(name, def, &path)?);
        }

        let mut root_map = map.clone();
        root_map.remove("definitions");
        root_map.remove("$defs");
        let root = loader.load("", &Value::Object(root_map), "#")?;

        Self::new(root, definitions)
    }

    /// Empty object schema with no properties
    pub fn empty() -> Self {
        Self {
            root: PropertySchema::new("", SchemaKind::Object(ObjectConstraints::default())),
            definitions: BTreeMap::new(),
        }
    }

    /// The root object schema
    pub fn root(&self) -> &PropertySchema {
        &self.root
    }

    fn object(&self) -> &ObjectConstraints {
        match self.root.kind() {
            SchemaKind::Object(c) => c,
            // `new` only accepts object roots.
            _ => unreachable!("form root is always an object"),
        }
    }

    /// Top-level properties in declaration order
    pub fn properties(&self) -> &[PropertySchema] {
        &self.object().properties
    }

    /// Looks up a top-level property
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.object().property(name)
    }

    /// Follows a property path through nested object schemas.
    pub fn property_at(&self, path: &[String]) -> Option<&PropertySchema> {
        let (first, rest) = path.split_first()?;
        let mut current = self.property(first)?;
        for segment in rest {
            current = current.as_object()?.property(segment)?;
        }
        Some(current)
    }

    /// Form-level required property names
    pub fn required(&self) -> &[String] {
        &self.object().required
    }

    /// Returns true if `name` is in the form-level required list
    pub fn is_required(&self, name: &str) -> bool {
        self.object().is_required(name)
    }

    /// Required names that do not match any declared property.
    ///
    /// These are tolerated; callers may log them.
    pub fn unknown_required_names(&self) -> Vec<&str> {
        self.required()
            .iter()
            .filter(|name| self.property(name).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Named reusable sub-schemas
    pub fn definitions(&self) -> &BTreeMap<String, PropertySchema> {
        &self.definitions
    }

    /// Looks up a definition by name
    pub fn definition(&self, name: &str) -> Option<&PropertySchema> {
        self.definitions.get(name)
    }

    /// Serializes back into a form schema document.
    pub fn to_value(&self) -> Value {
        let mut value = self.root.to_value();
        if !self.definitions.is_empty() {
            if let Value::Object(map) = &mut value {
                let defs: Map<String, Value> = self
                    .definitions
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_value()))
                    .collect();
                map.insert("definitions".into(), Value::Object(defs));
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{KindTag, SchemaErrorCode};
    use serde_json::json;

    fn sample() -> FormSchema {
        FormSchema::from_value(
            &json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "address": {
                        "type": "object",
                        "properties": {"city": {"$ref": "#/definitions/city"}}
                    }
                },
                "required": ["name", "ghost"],
                "definitions": {
                    "city": {"type": "string", "minLength": 2}
                }
            }),
            32,
        )
        .unwrap()
    }

    #[test]
    fn test_properties_and_required() {
        let schema = sample();
        assert_eq!(schema.properties().len(), 2);
        assert!(schema.is_required("name"));
        assert!(!schema.is_required("address"));
        assert_eq!(schema.property("name").unwrap().kind_tag(), KindTag::String);
    }

    #[test]
    fn test_unknown_required_names() {
        let schema = sample();
        assert_eq!(schema.unknown_required_names(), vec!["ghost"]);
    }

    #[test]
    fn test_nested_property_path() {
        let schema = sample();
        let path = vec!["address".to_string(), "city".to_string()];
        let city = schema.property_at(&path).unwrap();
        assert_eq!(city.as_string().unwrap().min_length, Some(2));

        let missing = vec!["address".to_string(), "zip".to_string()];
        assert!(schema.property_at(&missing).is_none());
    }

    #[test]
    fn test_definitions_loaded() {
        let schema = sample();
        assert!(schema.definition("city").is_some());
        assert_eq!(schema.definitions().len(), 1);
    }

    #[test]
    fn test_defs_alias() {
        let schema = FormSchema::from_value(
            &json!({
                "type": "object",
                "properties": {"id": {"$ref": "#/$defs/id"}},
                "$defs": {"id": {"type": "string", "format": "uuid"}}
            }),
            32,
        )
        .unwrap();
        assert_eq!(schema.property("id").unwrap().format(), Some("uuid"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = FormSchema::from_value(&json!({"type": "string"}), 32).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::Malformed);
    }

    #[test]
    fn test_round_trip_with_definitions() {
        let first = sample().to_value();
        let second = FormSchema::from_value(&first, 32).unwrap().to_value();
        assert_eq!(first, second);
    }
}
