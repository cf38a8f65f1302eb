//! Schema loader: builds `PropertySchema` trees from JSON documents
//!
//! - The `type` discriminator is dispatched through `KIND_PARSERS`; unknown
//!   discriminators fail instead of falling back to a default kind.
//! - `$ref` pointers into `definitions` / `$defs` are resolved inline.
//!   Sibling keywords next to a `$ref` override the referenced schema.
//! - Nesting is bounded by `max_depth`, which also stops runaway `$ref`
//!   chains that the cycle check cannot see.
//! - Every loaded node is charged against `max_nodes`. Each `$ref` is
//!   expanded in place, so the budget bounds the total size of the tree
//!   even when many properties reference the same definition.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    AdditionalProperties, ArrayConstraints, NumericConstraints, ObjectConstraints, PropertySchema,
    SchemaKind, StringConstraints,
};

type KindParser =
    fn(&mut SchemaLoader<'_>, &Map<String, Value>, &str, usize) -> SchemaResult<SchemaKind>;

/// Constructor table indexed by the `type` discriminator
const KIND_PARSERS: &[(&str, KindParser)] = &[
    ("string", parse_string_kind),
    ("integer", parse_integer_kind),
    ("number", parse_number_kind),
    ("boolean", parse_boolean_kind),
    ("array", parse_array_kind),
    ("object", parse_object_kind),
    ("null", parse_null_kind),
];

const REF_PREFIXES: &[&str] = &["#/definitions/", "#/$defs/"];

/// Default node budget for one schema document
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Loads property schemas, resolving references against one set of definitions.
pub struct SchemaLoader<'a> {
    definitions: &'a Map<String, Value>,
    max_depth: usize,
    max_nodes: usize,
    /// Nodes still available; shared by every `load` on this loader
    remaining_nodes: usize,
    /// References currently being expanded, innermost last
    ref_stack: Vec<String>,
}

impl<'a> SchemaLoader<'a> {
    /// Creates a loader over raw definitions (the `definitions`/`$defs` map).
    pub fn new(definitions: &'a Map<String, Value>, max_depth: usize) -> Self {
        Self {
            definitions,
            max_depth,
            max_nodes: DEFAULT_MAX_NODES,
            remaining_nodes: DEFAULT_MAX_NODES,
            ref_stack: Vec::new(),
        }
    }

    /// Replaces the node budget.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self.remaining_nodes = max_nodes;
        self
    }

    /// Nodes loaded so far
    pub fn nodes_loaded(&self) -> usize {
        self.max_nodes - self.remaining_nodes
    }

    /// Loads one named property schema rooted at `path`.
    pub fn load(&mut self, name: &str, value: &Value, path: &str) -> SchemaResult<PropertySchema> {
        self.load_at(name, value, path, 0)
    }

    fn load_at(
        &mut self,
        name: &str,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> SchemaResult<PropertySchema> {
        if depth > self.max_depth {
            return Err(SchemaError::depth_exceeded(path, self.max_depth));
        }

        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed(path, "schema must be an object"))?;

        if let Some(reference) = map.get("$ref") {
            return self.load_reference(name, map, reference, path, depth);
        }

        if self.remaining_nodes == 0 {
            return Err(SchemaError::too_large(path, self.max_nodes));
        }
        self.remaining_nodes -= 1;

        let discriminator = kind_discriminator(map, path)?;
        let parser = KIND_PARSERS
            .iter()
            .find(|(kind, _)| *kind == discriminator)
            .map(|(_, parser)| *parser)
            .ok_or_else(|| SchemaError::unknown_kind(path, &discriminator))?;

        let kind = parser(self, map, path, depth)?;
        let mut schema = PropertySchema::new(name, kind);
        self.load_metadata(&mut schema, map, path, depth)?;
        Ok(schema)
    }

    fn load_reference(
        &mut self,
        name: &str,
        map: &Map<String, Value>,
        reference: &Value,
        path: &str,
        depth: usize,
    ) -> SchemaResult<PropertySchema> {
        let reference = reference
            .as_str()
            .ok_or_else(|| SchemaError::malformed(path, "'$ref' must be a string"))?;

        let target_name = REF_PREFIXES
            .iter()
            .find_map(|prefix| reference.strip_prefix(prefix))
            .ok_or_else(|| SchemaError::unresolved_ref(path, reference))?;

        let target = self
            .definitions
            .get(target_name)
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaError::unresolved_ref(path, reference))?;

        if self.ref_stack.iter().any(|r| r == reference) {
            return Err(SchemaError::cyclic_ref(path, reference));
        }

        let mut merged = target.clone();
        for (key, value) in map {
            if key != "$ref" {
                merged.insert(key.clone(), value.clone());
            }
        }

        self.ref_stack.push(reference.to_string());
        let result = self.load_at(name, &Value::Object(merged), path, depth + 1);
        self.ref_stack.pop();
        result
    }

    fn load_metadata(
        &mut self,
        schema: &mut PropertySchema,
        map: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> SchemaResult<()> {
        schema.title = opt_string(map, "title", path)?;
        schema.description = opt_string(map, "description", path)?;
        schema.default = map.get("default").cloned();
        schema.deprecated = opt_bool(map, "deprecated", path)?;
        schema.examples = opt_array(map, "examples", path)?;
        schema.read_only = opt_bool(map, "readOnly", path)?;
        schema.write_only = opt_bool(map, "writeOnly", path)?;
        schema.enum_values = opt_array(map, "enum", path)?;
        schema.const_value = map.get("const").cloned();
        schema.all_of = self.load_list(map, "allOf", path, depth)?;
        schema.any_of = self.load_list(map, "anyOf", path, depth)?;
        schema.one_of = self.load_list(map, "oneOf", path, depth)?;

        schema.required = match map.get("required") {
            Some(Value::Bool(flag)) => *flag,
            // A list belongs to the object kind and was consumed by its parser.
            Some(Value::Array(_)) if schema.as_object().is_some() => false,
            Some(_) => {
                return Err(SchemaError::malformed(
                    path,
                    "'required' must be a boolean, or a list of names on an object",
                ))
            }
            None => false,
        };

        Ok(())
    }

    fn load_list(
        &mut self,
        map: &Map<String, Value>,
        key: &str,
        path: &str,
        depth: usize,
    ) -> SchemaResult<Vec<PropertySchema>> {
        let Some(value) = map.get(key) else {
            return Ok(Vec::new());
        };
        let list = value
            .as_array()
            .ok_or_else(|| SchemaError::malformed(path, format!("'{}' must be an array", key)))?;

        list.iter()
            .enumerate()
            .map(|(i, sub)| {
                let sub_path = format!("{}/{}/{}", path, key, i);
                self.load_at(key, sub, &sub_path, depth + 1)
            })
            .collect()
    }

    fn load_child(
        &mut self,
        map: &Map<String, Value>,
        key: &str,
        path: &str,
        depth: usize,
    ) -> SchemaResult<Option<Box<PropertySchema>>> {
        match map.get(key) {
            Some(value) => {
                let sub_path = format!("{}/{}", path, key);
                Ok(Some(Box::new(self.load_at(key, value, &sub_path, depth + 1)?)))
            }
            None => Ok(None),
        }
    }
}

/// Reads `type`, inferring object/array from structural keywords when absent.
fn kind_discriminator(map: &Map<String, Value>, path: &str) -> SchemaResult<String> {
    match map.get("type") {
        Some(Value::String(kind)) => Ok(kind.clone()),
        Some(_) => Err(SchemaError::malformed(path, "'type' must be a single string")),
        None if map.contains_key("properties") => Ok("object".into()),
        None if map.contains_key("items") => Ok("array".into()),
        None => Err(SchemaError::missing_kind(path)),
    }
}

fn parse_string_kind(
    _loader: &mut SchemaLoader<'_>,
    map: &Map<String, Value>,
    path: &str,
    _depth: usize,
) -> SchemaResult<SchemaKind> {
    let pattern = opt_string(map, "pattern", path)?;
    if let Some(p) = &pattern {
        regex::Regex::new(p)
            .map_err(|e| SchemaError::malformed(path, format!("invalid pattern: {}", e)))?;
    }

    Ok(SchemaKind::String(StringConstraints {
        format: opt_string(map, "format", path)?,
        min_length: opt_u64(map, "minLength", path)?,
        max_length: opt_u64(map, "maxLength", path)?,
        pattern,
        content_media_type: opt_string(map, "contentMediaType", path)?,
        content_encoding: opt_string(map, "contentEncoding", path)?,
    }))
}

fn parse_numeric(map: &Map<String, Value>, path: &str) -> SchemaResult<NumericConstraints> {
    Ok(NumericConstraints {
        minimum: opt_number(map, "minimum", path)?,
        maximum: opt_number(map, "maximum", path)?,
        exclusive_minimum: opt_number(map, "exclusiveMinimum", path)?,
        exclusive_maximum: opt_number(map, "exclusiveMaximum", path)?,
        multiple_of: opt_number(map, "multipleOf", path)?,
    })
}

fn parse_integer_kind(
    _loader: &mut SchemaLoader<'_>,
    map: &Map<String, Value>,
    path: &str,
    _depth: usize,
) -> SchemaResult<SchemaKind> {
    Ok(SchemaKind::Integer(parse_numeric(map, path)?))
}

fn parse_number_kind(
    _loader: &mut SchemaLoader<'_>,
    map: &Map<String, Value>,
    path: &str,
    _depth: usize,
) -> SchemaResult<SchemaKind> {
    Ok(SchemaKind::Number(parse_numeric(map, path)?))
}

fn parse_boolean_kind(
    _loader: &mut SchemaLoader<'_>,
    _map: &Map<String, Value>,
    _path: &str,
    _depth: usize,
) -> SchemaResult<SchemaKind> {
    Ok(SchemaKind::Boolean)
}

fn parse_null_kind(
    _loader: &mut SchemaLoader<'_>,
    _map: &Map<String, Value>,
    _path: &str,
    _depth: usize,
) -> SchemaResult<SchemaKind> {
    Ok(SchemaKind::Null)
}

fn parse_array_kind(
    loader: &mut SchemaLoader<'_>,
    map: &Map<String, Value>,
    path: &str,
    depth: usize,
) -> SchemaResult<SchemaKind> {
    Ok(SchemaKind::Array(ArrayConstraints {
        items: loader.load_child(map, "items", path, depth)?,
        min_items: opt_u64(map, "minItems", path)?,
        max_items: opt_u64(map, "maxItems", path)?,
        contains: loader.load_child(map, "contains", path, depth)?,
        min_contains: opt_u64(map, "minContains", path)?,
        max_contains: opt_u64(map, "maxContains", path)?,
        unique_items: opt_bool(map, "uniqueItems", path)?,
    }))
}

fn parse_object_kind(
    loader: &mut SchemaLoader<'_>,
    map: &Map<String, Value>,
    path: &str,
    depth: usize,
) -> SchemaResult<SchemaKind> {
    let mut constraints = ObjectConstraints::default();

    if let Some(value) = map.get("properties") {
        let properties = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed(path, "'properties' must be an object"))?;
        for (name, sub) in properties {
            let sub_path = format!("{}/properties/{}", path, name);
            constraints
                .properties
                .push(loader.load_at(name, sub, &sub_path, depth + 1)?);
        }
    }

    if let Some(Value::Array(names)) = map.get("required") {
        constraints.required = string_list(names, path, "required")?;
    }

    if let Some(value) = map.get("dependentRequired") {
        let deps = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed(path, "'dependentRequired' must be an object"))?;
        let mut dependent_required = BTreeMap::new();
        for (name, list) in deps {
            let list = list.as_array().ok_or_else(|| {
                SchemaError::malformed(
                    path,
                    format!("'dependentRequired.{}' must be an array", name),
                )
            })?;
            dependent_required.insert(name.clone(), string_list(list, path, "dependentRequired")?);
        }
        constraints.dependent_required = dependent_required;
    }

    constraints.min_properties = opt_u64(map, "minProperties", path)?;
    constraints.max_properties = opt_u64(map, "maxProperties", path)?;
    constraints.additional_properties = match map.get("additionalProperties") {
        Some(Value::Bool(flag)) => Some(AdditionalProperties::Allowed(*flag)),
        Some(value @ Value::Object(_)) => {
            let sub_path = format!("{}/additionalProperties", path);
            let schema = loader.load_at("additionalProperties", value, &sub_path, depth + 1)?;
            Some(AdditionalProperties::Schema(Box::new(schema)))
        }
        Some(_) => {
            return Err(SchemaError::malformed(
                path,
                "'additionalProperties' must be a boolean or a schema",
            ))
        }
        None => None,
    };

    Ok(SchemaKind::Object(constraints))
}

fn string_list(values: &[Value], path: &str, key: &str) -> SchemaResult<Vec<String>> {
    values
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    SchemaError::malformed(path, format!("'{}' entries must be strings", key))
                })
        })
        .collect()
}

fn opt_string(map: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<String>> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::malformed(path, format!("'{}' must be a string", key))),
        None => Ok(None),
    }
}

fn opt_bool(map: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<bool> {
    match map.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SchemaError::malformed(path, format!("'{}' must be a boolean", key))),
        None => Ok(false),
    }
}

fn opt_u64(map: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<u64>> {
    match map.get(key) {
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            SchemaError::malformed(path, format!("'{}' must be a non-negative integer", key))
        }),
        None => Ok(None),
    }
}

fn opt_number(map: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<Number>> {
    match map.get(key) {
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(_) => Err(SchemaError::malformed(path, format!("'{}' must be a number", key))),
        None => Ok(None),
    }
}

fn opt_array(map: &Map<String, Value>, key: &str, path: &str) -> SchemaResult<Option<Vec<Value>>> {
    match map.get(key) {
        Some(Value::Array(values)) => Ok(Some(values.clone())),
        Some(_) => Err(SchemaError::malformed(path, format!("'{}' must be an array", key))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{KindTag, SchemaErrorCode};
    use serde_json::json;

    fn load(value: Value) -> SchemaResult<PropertySchema> {
        let defs = Map::new();
        SchemaLoader::new(&defs, 16).load("field", &value, "#")
    }

    #[test]
    fn test_load_string_schema() {
        let schema = load(json!({
            "type": "string",
            "format": "email",
            "minLength": 3,
            "title": "Email"
        }))
        .unwrap();

        assert_eq!(schema.name(), "field");
        assert_eq!(schema.kind_tag(), KindTag::String);
        assert_eq!(schema.format(), Some("email"));
        assert_eq!(schema.as_string().unwrap().min_length, Some(3));
        assert_eq!(schema.title.as_deref(), Some("Email"));
    }

    #[test]
    fn test_unknown_discriminator_fails() {
        let err = load(json!({"type": "decimal"})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownKind);
        assert!(err.message().contains("decimal"));
    }

    #[test]
    fn test_missing_type_inferred_from_structure() {
        let object = load(json!({"properties": {"a": {"type": "string"}}})).unwrap();
        assert_eq!(object.kind_tag(), KindTag::Object);

        let array = load(json!({"items": {"type": "integer"}})).unwrap();
        assert_eq!(array.kind_tag(), KindTag::Array);

        let err = load(json!({"title": "nothing"})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingKind);
    }

    #[test]
    fn test_required_flag_and_list() {
        let schema = load(json!({"type": "string", "required": true})).unwrap();
        assert!(schema.required);

        let object = load(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "required": ["a"]
        }))
        .unwrap();
        assert!(!object.required);
        assert_eq!(object.as_object().unwrap().required, vec!["a".to_string()]);

        let err = load(json!({"type": "string", "required": ["a"]})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::Malformed);
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let schema = load(json!({
            "type": "object",
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "string"},
                "mid": {"type": "string"}
            }
        }))
        .unwrap();

        let names: Vec<&str> = schema
            .as_object()
            .unwrap()
            .properties
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_ref_resolution_with_sibling_override() {
        let defs = json!({
            "zip": {"type": "string", "pattern": "^[0-9]{5}$", "title": "Zip"}
        });
        let defs = defs.as_object().unwrap();
        let mut loader = SchemaLoader::new(defs, 16);

        let schema = loader
            .load("postcode", &json!({"$ref": "#/definitions/zip", "title": "Postcode"}), "#")
            .unwrap();
        assert_eq!(schema.name(), "postcode");
        assert_eq!(schema.title.as_deref(), Some("Postcode"));
        assert_eq!(schema.as_string().unwrap().pattern.as_deref(), Some("^[0-9]{5}$"));

        let via_defs = loader.load("z", &json!({"$ref": "#/$defs/zip"}), "#").unwrap();
        assert_eq!(via_defs.kind_tag(), KindTag::String);
    }

    #[test]
    fn test_unresolved_ref_fails() {
        let err = load(json!({"$ref": "#/definitions/missing"})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnresolvedRef);
    }

    #[test]
    fn test_cyclic_ref_fails() {
        let defs = json!({
            "node": {
                "type": "object",
                "properties": {"next": {"$ref": "#/definitions/node"}}
            }
        });
        let defs = defs.as_object().unwrap();
        let mut loader = SchemaLoader::new(defs, 64);

        let err = loader
            .load("root", &json!({"$ref": "#/definitions/node"}), "#")
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::CyclicRef);
    }

    #[test]
    fn test_depth_guard() {
        let mut value = json!({"type": "string"});
        for _ in 0..10 {
            value = json!({"type": "array", "items": value});
        }

        let defs = Map::new();
        let err = SchemaLoader::new(&defs, 5).load("deep", &value, "#").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DepthExceeded);

        assert!(SchemaLoader::new(&defs, 32).load("deep", &value, "#").is_ok());
    }

    #[test]
    fn test_node_budget() {
        let value = json!({
            "type": "object",
            "properties": {
                "a": {"type": "string"},
                "b": {"type": "string"},
                "c": {"type": "string"}
            }
        });
        let defs = Map::new();

        let mut loader = SchemaLoader::new(&defs, 16).with_max_nodes(4);
        assert!(loader.load("form", &value, "#").is_ok());
        assert_eq!(loader.nodes_loaded(), 4);

        let err = SchemaLoader::new(&defs, 16)
            .with_max_nodes(3)
            .load("form", &value, "#")
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TooLarge);
        assert_eq!(err.path(), "#/properties/c");
    }

    #[test]
    fn test_shared_reference_charged_per_use() {
        let defs = json!({"name": {"type": "string", "minLength": 1}});
        let defs = defs.as_object().unwrap();
        let value = json!({
            "type": "object",
            "properties": {
                "first": {"$ref": "#/definitions/name"},
                "last": {"$ref": "#/definitions/name"}
            }
        });

        let mut loader = SchemaLoader::new(defs, 16);
        loader.load("form", &value, "#").unwrap();
        assert_eq!(loader.nodes_loaded(), 3);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = load(json!({"type": "string", "pattern": "(["})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::Malformed);
    }

    #[test]
    fn test_additional_properties_variants() {
        let flag = load(json!({"type": "object", "additionalProperties": false})).unwrap();
        assert_eq!(
            flag.as_object().unwrap().additional_properties,
            Some(AdditionalProperties::Allowed(false))
        );

        let schema = load(json!({
            "type": "object",
            "additionalProperties": {"type": "integer"}
        }))
        .unwrap();
        match &schema.as_object().unwrap().additional_properties {
            Some(AdditionalProperties::Schema(s)) => assert_eq!(s.kind_tag(), KindTag::Integer),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_round_trip() {
        let source = json!({
            "type": "object",
            "title": "Profile",
            "properties": {
                "name": {"type": "string", "minLength": 2, "maxLength": 40},
                "age": {"type": "integer", "minimum": 0, "exclusiveMaximum": 150},
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
                "role": {"type": "string", "enum": ["Admin", "User"]},
                "extra": {"anyOf": [{"type": "string"}, {"type": "null"}], "type": "string"}
            },
            "required": ["name"],
            "dependentRequired": {"age": ["name"]},
            "additionalProperties": false
        });

        let first = load(source).unwrap().to_value();
        let second = load(first.clone()).unwrap().to_value();
        assert_eq!(first, second);
    }
}
