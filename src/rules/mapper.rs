//! Schema-to-rules compilation
//!
//! Turns property schemas, UI control hints and form-level `required` lists
//! into four-phase rule sets. Kind and format dispatch goes through the
//! lookup tables in `tables`.

use serde_json::Value;
use std::collections::BTreeMap;

use super::rule_set::{Phase, RuleSet, RuleToken};
use super::tables::{self, FormatRule};
use crate::config::FormworkConfig;
use crate::form::{Field, Form};
use crate::patterns;
use crate::schema::{
    ArrayConstraints, KindTag, NumericConstraints, PropertySchema, SchemaKind, StringConstraints,
};

/// Compiles schemas into rule sets. Holds no per-form state.
#[derive(Debug, Clone)]
pub struct SchemaToRulesMapper {
    phone_pattern: String,
}

impl Default for SchemaToRulesMapper {
    fn default() -> Self {
        Self {
            phone_pattern: patterns::PHONE.to_string(),
        }
    }
}

impl SchemaToRulesMapper {
    pub fn new(config: &FormworkConfig) -> Self {
        Self {
            phone_pattern: config.phone_pattern.clone(),
        }
    }

    /// Rules implied by one property schema on its own.
    pub fn map_schema_to_rules(&self, schema: &PropertySchema) -> RuleSet {
        let mut rules = RuleSet::new();
        let kind = schema.kind_tag();

        if let Some(cast) = tables::cast_token(kind) {
            rules.push(Phase::Cast, RuleToken::new(cast));
        }

        if kind == KindTag::String {
            rules.push(Phase::Sanitize, RuleToken::new("trim"));
        }

        if schema.format() == Some("email") || schema.enum_values.is_some() {
            rules.push_unique(Phase::Transform, RuleToken::new("lowercase"));
        }

        if schema.required {
            rules.push(Phase::Validate, RuleToken::new("required"));
        }

        match schema.kind() {
            SchemaKind::String(constraints) => {
                self.string_validators(schema, constraints, &mut rules)
            }
            SchemaKind::Integer(constraints) | SchemaKind::Number(constraints) => {
                numeric_validators(kind, constraints, &mut rules);
                enum_validator(schema, &mut rules);
            }
            SchemaKind::Boolean => enum_validator(schema, &mut rules),
            SchemaKind::Array(constraints) => array_validators(constraints, &mut rules),
            SchemaKind::Object(_) | SchemaKind::Null => {}
        }

        rules
    }

    /// Schema rules plus whatever the field's control contributes.
    pub fn map_field_to_rules(&self, field: &Field<'_>) -> RuleSet {
        let mut rules = self.map_schema_to_rules(field.schema());

        if let Some(control_type) = field.control_type() {
            let mut control_rules = RuleSet::new();
            for (phase, token) in tables::control_rules(control_type) {
                control_rules.push(phase, RuleToken::new(token));
            }
            rules.merge(control_rules);
        }

        rules
    }

    /// Rule sets for every field of `form`, keyed by field name.
    ///
    /// Names in the form-level `required` list get an extra `required`
    /// validator on top of anything the field already produced. Names that
    /// match no field are ignored.
    pub fn map_form_to_rules(&self, form: &Form) -> BTreeMap<String, RuleSet> {
        let mut compiled: BTreeMap<String, RuleSet> = form
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), self.map_field_to_rules(field)))
            .collect();

        for name in form.schema().required() {
            if let Some(rules) = compiled.get_mut(name) {
                rules.push(Phase::Validate, RuleToken::new("required"));
            }
        }

        compiled
    }

    fn string_validators(
        &self,
        schema: &PropertySchema,
        constraints: &StringConstraints,
        rules: &mut RuleSet,
    ) {
        if let Some(min) = constraints.min_length {
            rules.push(Phase::Validate, RuleToken::with_arg("min_length", min));
        }
        if let Some(max) = constraints.max_length {
            rules.push(Phase::Validate, RuleToken::with_arg("max_length", max));
        }

        if let Some(format) = &constraints.format {
            let token = match tables::format_rule(format) {
                FormatRule::Token(token) => RuleToken::parse(token),
                FormatRule::Phone => RuleToken::with_arg("regex", &self.phone_pattern),
            };
            rules.push(Phase::Validate, token);
        }

        if let Some(pattern) = &constraints.pattern {
            rules.push(Phase::Validate, RuleToken::with_arg("regex", pattern));
        }

        enum_validator(schema, rules);

        if let Some(media_type) = &constraints.content_media_type {
            rules.push(Phase::Validate, RuleToken::new(tables::media_type_token(media_type)));
        }
    }
}

fn numeric_validators(kind: KindTag, constraints: &NumericConstraints, rules: &mut RuleSet) {
    if let Some(validator) = tables::numeric_validator(kind) {
        rules.push(Phase::Validate, RuleToken::new(validator));
    }

    let bounds = [
        ("gte", &constraints.minimum),
        ("lte", &constraints.maximum),
        ("gt", &constraints.exclusive_minimum),
        ("lt", &constraints.exclusive_maximum),
        ("multiple_of", &constraints.multiple_of),
    ];
    for (name, bound) in bounds {
        if let Some(bound) = bound {
            rules.push(Phase::Validate, RuleToken::with_arg(name, bound));
        }
    }
}

fn array_validators(constraints: &ArrayConstraints, rules: &mut RuleSet) {
    if let Some(min) = constraints.min_items {
        rules.push(Phase::Validate, RuleToken::with_arg("min_items", min));
    }
    if let Some(max) = constraints.max_items {
        rules.push(Phase::Validate, RuleToken::with_arg("max_items", max));
    }
    if constraints.unique_items {
        rules.push(Phase::Validate, RuleToken::new("unique"));
    }
}

/// `in:` over the schema's enum, for scalar kinds only
fn enum_validator(schema: &PropertySchema, rules: &mut RuleSet) {
    if !schema.kind_tag().is_scalar() {
        return;
    }
    if let Some(values) = &schema.enum_values {
        rules.push(Phase::Validate, RuleToken::with_arg("in", enum_list(values)));
    }
}

/// Lowercased enum values as one CSV record.
///
/// Members containing a comma or a quote are quoted, so `in_list` can split
/// the record back into the declared members.
fn enum_list(values: &[Value]) -> String {
    let members: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.to_lowercase(),
            other => other.to_string().to_lowercase(),
        })
        .collect();
    if members.is_empty() {
        return String::new();
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let written = writer.write_record(&members).is_ok();
    match writer.into_inner() {
        Ok(bytes) if written => String::from_utf8_lossy(&bytes)
            .trim_end_matches('\n')
            .to_string(),
        // In-memory writes do not fail.
        _ => members.join(","),
    }
}
