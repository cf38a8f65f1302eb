//! Property schema model
//!
//! A `PropertySchema` describes one form field. Shared metadata lives on the
//! struct; everything that only makes sense for one kind lives in the
//! `SchemaKind` variant, which is fixed at construction.
//!
//! Supported kinds:
//! - string: format, length bounds, pattern, content media type/encoding
//! - integer / number: inclusive and exclusive bounds, multipleOf
//! - boolean, null: no extra constraints
//! - array: items, item count bounds, contains, uniqueItems
//! - object: ordered properties, required names, dependentRequired, bounds

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Discriminator of a schema kind, as written in the `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindTag {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl KindTag {
    /// Returns the `type` keyword value
    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::String => "string",
            KindTag::Integer => "integer",
            KindTag::Number => "number",
            KindTag::Boolean => "boolean",
            KindTag::Array => "array",
            KindTag::Object => "object",
            KindTag::Null => "null",
        }
    }

    /// Returns true for kinds that hold a single scalar value
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            KindTag::String | KindTag::Integer | KindTag::Number | KindTag::Boolean
        )
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// String constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub format: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub content_media_type: Option<String>,
    pub content_encoding: Option<String>,
}

/// Numeric constraints shared by integer and number kinds.
///
/// Bounds keep the original JSON number so `1` and `1.0` survive a round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericConstraints {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub multiple_of: Option<Number>,
}

/// Array constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayConstraints {
    pub items: Option<Box<PropertySchema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub contains: Option<Box<PropertySchema>>,
    pub min_contains: Option<u64>,
    pub max_contains: Option<u64>,
    pub unique_items: bool,
}

/// `additionalProperties` is either a flag or a schema for extra values
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<PropertySchema>),
}

/// Object constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectConstraints {
    /// Properties in declaration order (order matters for rendering only)
    pub properties: Vec<PropertySchema>,
    pub required: Vec<String>,
    pub dependent_required: BTreeMap<String, Vec<String>>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub additional_properties: Option<AdditionalProperties>,
}

impl ObjectConstraints {
    /// Looks up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Returns true if `name` is listed in `required`
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Kind-specific part of a property schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String(StringConstraints),
    Integer(NumericConstraints),
    Number(NumericConstraints),
    Boolean,
    Array(ArrayConstraints),
    Object(ObjectConstraints),
    Null,
}

impl SchemaKind {
    /// Returns the discriminator for this kind
    pub fn tag(&self) -> KindTag {
        match self {
            SchemaKind::String(_) => KindTag::String,
            SchemaKind::Integer(_) => KindTag::Integer,
            SchemaKind::Number(_) => KindTag::Number,
            SchemaKind::Boolean => KindTag::Boolean,
            SchemaKind::Array(_) => KindTag::Array,
            SchemaKind::Object(_) => KindTag::Object,
            SchemaKind::Null => KindTag::Null,
        }
    }
}

/// Structural and validation description of one form field
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    name: String,
    kind: SchemaKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub deprecated: bool,
    pub examples: Option<Vec<Value>>,
    pub read_only: bool,
    pub write_only: bool,
    pub enum_values: Option<Vec<Value>>,
    /// `Some(Value::Null)` means `"const": null` was given
    pub const_value: Option<Value>,
    pub all_of: Vec<PropertySchema>,
    pub any_of: Vec<PropertySchema>,
    pub one_of: Vec<PropertySchema>,
    /// The property itself is marked required (`"required": true`)
    pub required: bool,
}

impl PropertySchema {
    /// Creates a schema with no metadata
    pub fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            description: None,
            default: None,
            deprecated: false,
            examples: None,
            read_only: false,
            write_only: false,
            enum_values: None,
            const_value: None,
            all_of: Vec::new(),
            any_of: Vec::new(),
            one_of: Vec::new(),
            required: false,
        }
    }

    /// Unconstrained string property
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::String(StringConstraints::default()))
    }

    /// Unconstrained integer property
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Integer(NumericConstraints::default()))
    }

    /// Unconstrained number property
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Number(NumericConstraints::default()))
    }

    /// Boolean property
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Boolean)
    }

    /// Property name (the key it is declared under)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind-specific constraints
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Kind discriminator
    pub fn kind_tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Marks the property itself as required
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the allowed values
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// String constraints, if this is a string schema
    pub fn as_string(&self) -> Option<&StringConstraints> {
        match &self.kind {
            SchemaKind::String(c) => Some(c),
            _ => None,
        }
    }

    /// Numeric constraints, if this is an integer or number schema
    pub fn as_numeric(&self) -> Option<&NumericConstraints> {
        match &self.kind {
            SchemaKind::Integer(c) | SchemaKind::Number(c) => Some(c),
            _ => None,
        }
    }

    /// Array constraints, if this is an array schema
    pub fn as_array(&self) -> Option<&ArrayConstraints> {
        match &self.kind {
            SchemaKind::Array(c) => Some(c),
            _ => None,
        }
    }

    /// Object constraints, if this is an object schema
    pub fn as_object(&self) -> Option<&ObjectConstraints> {
        match &self.kind {
            SchemaKind::Object(c) => Some(c),
            _ => None,
        }
    }

    /// String format, if any
    pub fn format(&self) -> Option<&str> {
        self.as_string().and_then(|c| c.format.as_deref())
    }

    /// Serializes back into the JSON schema shape it was loaded from.
    ///
    /// Loading the output again yields an equal value.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.kind_tag().as_str().into()));

        put_opt_str(&mut map, "title", &self.title);
        put_opt_str(&mut map, "description", &self.description);
        if let Some(default) = &self.default {
            map.insert("default".into(), default.clone());
        }
        put_flag(&mut map, "deprecated", self.deprecated);
        if let Some(examples) = &self.examples {
            map.insert("examples".into(), Value::Array(examples.clone()));
        }
        put_flag(&mut map, "readOnly", self.read_only);
        put_flag(&mut map, "writeOnly", self.write_only);
        if let Some(values) = &self.enum_values {
            map.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(value) = &self.const_value {
            map.insert("const".into(), value.clone());
        }
        put_schemas(&mut map, "allOf", &self.all_of);
        put_schemas(&mut map, "anyOf", &self.any_of);
        put_schemas(&mut map, "oneOf", &self.one_of);

        match &self.kind {
            SchemaKind::String(c) => {
                put_opt_str(&mut map, "format", &c.format);
                put_opt_u64(&mut map, "minLength", c.min_length);
                put_opt_u64(&mut map, "maxLength", c.max_length);
                put_opt_str(&mut map, "pattern", &c.pattern);
                put_opt_str(&mut map, "contentMediaType", &c.content_media_type);
                put_opt_str(&mut map, "contentEncoding", &c.content_encoding);
            }
            SchemaKind::Integer(c) | SchemaKind::Number(c) => {
                put_opt_number(&mut map, "minimum", &c.minimum);
                put_opt_number(&mut map, "maximum", &c.maximum);
                put_opt_number(&mut map, "exclusiveMinimum", &c.exclusive_minimum);
                put_opt_number(&mut map, "exclusiveMaximum", &c.exclusive_maximum);
                put_opt_number(&mut map, "multipleOf", &c.multiple_of);
            }
            SchemaKind::Array(c) => {
                if let Some(items) = &c.items {
                    map.insert("items".into(), items.to_value());
                }
                put_opt_u64(&mut map, "minItems", c.min_items);
                put_opt_u64(&mut map, "maxItems", c.max_items);
                if let Some(contains) = &c.contains {
                    map.insert("contains".into(), contains.to_value());
                }
                put_opt_u64(&mut map, "minContains", c.min_contains);
                put_opt_u64(&mut map, "maxContains", c.max_contains);
                put_flag(&mut map, "uniqueItems", c.unique_items);
            }
            SchemaKind::Object(c) => {
                if !c.properties.is_empty() {
                    let properties: Map<String, Value> = c
                        .properties
                        .iter()
                        .map(|p| (p.name().to_string(), p.to_value()))
                        .collect();
                    map.insert("properties".into(), Value::Object(properties));
                }
                if !c.required.is_empty() {
                    let names = c.required.iter().cloned().map(Value::String).collect();
                    map.insert("required".into(), Value::Array(names));
                }
                if !c.dependent_required.is_empty() {
                    let deps: Map<String, Value> = c
                        .dependent_required
                        .iter()
                        .map(|(k, v)| {
                            let names = v.iter().cloned().map(Value::String).collect();
                            (k.clone(), Value::Array(names))
                        })
                        .collect();
                    map.insert("dependentRequired".into(), Value::Object(deps));
                }
                put_opt_u64(&mut map, "minProperties", c.min_properties);
                put_opt_u64(&mut map, "maxProperties", c.max_properties);
                match &c.additional_properties {
                    Some(AdditionalProperties::Allowed(flag)) => {
                        map.insert("additionalProperties".into(), Value::Bool(*flag));
                    }
                    Some(AdditionalProperties::Schema(schema)) => {
                        map.insert("additionalProperties".into(), schema.to_value());
                    }
                    None => {}
                }
            }
            SchemaKind::Boolean | SchemaKind::Null => {}
        }

        // An object's `required` key holds its property list; the flag only
        // goes out when that list is empty.
        let list_taken = map.get("required").map_or(false, Value::is_array);
        if self.required && !list_taken {
            map.insert("required".into(), Value::Bool(true));
        }

        Value::Object(map)
    }
}

fn put_opt_str(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(key.into(), Value::String(v.clone()));
    }
}

fn put_opt_u64(map: &mut Map<String, Value>, key: &str, value: Option<u64>) {
    if let Some(v) = value {
        map.insert(key.into(), Value::Number(v.into()));
    }
}

fn put_opt_number(map: &mut Map<String, Value>, key: &str, value: &Option<Number>) {
    if let Some(v) = value {
        map.insert(key.into(), Value::Number(v.clone()));
    }
}

fn put_flag(map: &mut Map<String, Value>, key: &str, flag: bool) {
    if flag {
        map.insert(key.into(), Value::Bool(true));
    }
}

fn put_schemas(map: &mut Map<String, Value>, key: &str, schemas: &[PropertySchema]) {
    if !schemas.is_empty() {
        let values = schemas.iter().map(PropertySchema::to_value).collect();
        map.insert(key.into(), Value::Array(values));
    }
}
