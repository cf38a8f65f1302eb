//! Form definitions
//!
//! A form bundles a root schema, an optional UI schema, data and free-form
//! options. Forms are immutable; `with_data` returns a new form sharing the
//! schema and UI schema.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::data::Data;
use super::errors::{FormError, FormResult};
use super::field::Field;
use super::uischema::UiElement;
use crate::config::FormworkConfig;
use crate::schema::FormSchema;

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    schema: Arc<FormSchema>,
    uischema: Option<Arc<UiElement>>,
    data: Data,
    options: Map<String, Value>,
}

impl Form {
    /// Creates a form; every control scope must resolve to a schema property.
    pub fn new(
        schema: FormSchema,
        uischema: Option<UiElement>,
        data: Data,
        options: Map<String, Value>,
    ) -> FormResult<Self> {
        if let Some(ui) = &uischema {
            check_scopes(&schema, ui)?;
        }
        Ok(Self {
            schema: Arc::new(schema),
            uischema: uischema.map(Arc::new),
            data,
            options,
        })
    }

    /// Form with no UI schema, data or options
    pub fn from_schema(schema: FormSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            uischema: None,
            data: Data::new(),
            options: Map::new(),
        }
    }

    /// Parses a form definition document:
    /// `{"schema": {...}, "uischema": {...}, "data": {...}, "options": {...}}`.
    ///
    /// Only `schema` is mandatory.
    pub fn from_value(value: &Value, config: &FormworkConfig) -> FormResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| FormError::MalformedDefinition("definition must be an object".into()))?;

        let schema_value = map
            .get("schema")
            .ok_or_else(|| FormError::MalformedDefinition("missing 'schema'".into()))?;
        let schema = FormSchema::from_value_with_budget(
            schema_value,
            config.max_schema_depth,
            config.max_schema_nodes,
        )?;

        let uischema = match map.get("uischema") {
            None | Some(Value::Null) => None,
            Some(ui) => Some(UiElement::from_value(ui, config.max_schema_depth)?),
        };

        let data = match map.get("data") {
            Some(data) => Data::from_value(data)?,
            None => Data::new(),
        };

        let options = match map.get("options") {
            Some(Value::Object(options)) => options.clone(),
            None | Some(Value::Null) => Map::new(),
            Some(_) => {
                return Err(FormError::MalformedDefinition("'options' must be an object".into()))
            }
        };

        Self::new(schema, uischema, data, options)
    }

    /// New form carrying `data`; `self` is left untouched.
    pub fn with_data(&self, data: Data) -> Form {
        Form {
            schema: Arc::clone(&self.schema),
            uischema: self.uischema.clone(),
            data,
            options: self.options.clone(),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn uischema(&self) -> Option<&UiElement> {
        self.uischema.as_deref()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// One field per top-level property, in schema order.
    ///
    /// A field is paired with the first control scoped exactly to
    /// `#/properties/<name>`.
    pub fn fields(&self) -> Vec<Field<'_>> {
        self.schema
            .properties()
            .iter()
            .map(|schema| {
                let control = self
                    .uischema
                    .as_deref()
                    .and_then(|ui| ui.control_for(schema.name()));
                Field::new(schema, control)
            })
            .collect()
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("schema".into(), self.schema.to_value());
        if let Some(ui) = &self.uischema {
            map.insert("uischema".into(), ui.to_value());
        }
        map.insert("data".into(), self.data.to_value());
        if !self.options.is_empty() {
            map.insert("options".into(), Value::Object(self.options.clone()));
        }
        Value::Object(map)
    }
}

fn check_scopes(schema: &FormSchema, ui: &UiElement) -> FormResult<()> {
    for control in ui.controls() {
        let path = control.property_path()?;
        if schema.property_at(&path).is_none() {
            return Err(FormError::ScopeNotFound(control.scope().to_string()));
        }
    }
    Ok(())
}
