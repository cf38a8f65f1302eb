//! Form data processing
//!
//! Compiles a form's rule sets and runs every field through the rule
//! engine. A field that fails keeps its raw value and records its messages;
//! the remaining fields are still processed.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::result::ProcessResult;
use crate::config::{ConfigError, ConfigResult, FormworkConfig};
use crate::engine::{RuleEngine, StandardRuleEngine};
use crate::form::{Data, Form};
use crate::observability::{Event, Logger};
use crate::rules::SchemaToRulesMapper;

/// Fallback message for a failure that carried none
const INVALID: &str = "is invalid";

pub struct FormDataProcessor {
    mapper: SchemaToRulesMapper,
    engine: Arc<dyn RuleEngine>,
    logger: Logger,
}

impl FormDataProcessor {
    /// Processor running `engine`; `config` is validated first.
    pub fn new(config: &FormworkConfig, engine: Arc<dyn RuleEngine>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            mapper: SchemaToRulesMapper::new(config),
            engine,
            logger: config.logger(),
        })
    }

    /// Processor running the [`StandardRuleEngine`]
    pub fn with_standard_engine(config: &FormworkConfig) -> ConfigResult<Self> {
        let engine = StandardRuleEngine::new().map_err(|e| ConfigError::Engine(e.to_string()))?;
        Self::new(config, Arc::new(engine))
    }

    /// Replaces the logger built from the configuration
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn mapper(&self) -> &SchemaToRulesMapper {
        &self.mapper
    }

    /// Processes `data` against `form`.
    ///
    /// Never fails: per-field problems end up in the result's errors.
    pub fn process(&self, form: &Form, data: &Data) -> ProcessResult {
        let compiled = self.mapper.map_form_to_rules(form);

        for name in form.schema().unknown_required_names() {
            self.logger.event(Event::RequiredNameUnknown, &[("field", name)]);
        }
        let field_count = compiled.len().to_string();
        self.logger
            .event(Event::FormCompiled, &[("fields", field_count.as_str())]);

        let mut processed = Map::new();
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (name, rules) in &compiled {
            let raw = data.get(name).cloned().unwrap_or(Value::Null);

            match self.engine.process(&raw, rules) {
                Ok(value) => {
                    processed.insert(name.clone(), value);
                }
                Err(failure) => {
                    let event = if failure.is_validation() {
                        Event::FieldRejected
                    } else {
                        Event::FieldFailed
                    };
                    let reason = failure.to_string();
                    self.logger
                        .event(event, &[("field", name.as_str()), ("reason", reason.as_str())]);

                    let mut messages = failure.messages();
                    if messages.is_empty() {
                        messages.push(INVALID.to_string());
                    }
                    errors.insert(name.clone(), messages);
                    processed.insert(name.clone(), raw);
                }
            }
        }

        for (key, value) in data.iter() {
            if !compiled.contains_key(key) {
                processed.insert(key.clone(), value.clone());
            }
        }

        let rejected = errors.len().to_string();
        self.logger.event(
            Event::ProcessComplete,
            &[("fields", field_count.as_str()), ("rejected", rejected.as_str())],
        );

        ProcessResult::new(form, processed, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RuleFailure, RuleResult};
    use crate::observability::Severity;
    use crate::rules::RuleSet;
    use serde_json::json;

    fn form(schema: Value) -> Form {
        Form::from_value(&json!({ "schema": schema }), &FormworkConfig::default()).unwrap()
    }

    fn data(value: Value) -> Data {
        Data::from_value(&value).unwrap()
    }

    fn processor() -> FormDataProcessor {
        FormDataProcessor::with_standard_engine(&FormworkConfig::quiet()).unwrap()
    }

    /// Fails every field whose value is the string "boom"
    struct Exploding;

    impl RuleEngine for Exploding {
        fn process(&self, value: &Value, _rules: &RuleSet) -> RuleResult<Value> {
            if value == "boom" {
                Err(RuleFailure::unexpected("engine exploded"))
            } else {
                Ok(value.clone())
            }
        }
    }

    #[test]
    fn test_integer_string_cast() {
        let form = form(json!({"type": "object", "properties": {"age": {"type": "integer"}}}));
        let result = processor().process(&form, &data(json!({"age": "25"})));

        assert!(result.is_valid());
        assert_eq!(result.processed_data()["age"], json!(25));
    }

    #[test]
    fn test_rejected_field_keeps_raw_value() {
        let form = form(json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
            "required": ["name"]
        }));
        let result = processor().process(&form, &data(json!({"name": "", "age": "7"})));

        assert!(!result.is_valid());
        assert_eq!(result.field_errors("name"), &["is required".to_string()]);
        assert_eq!(result.processed_data()["name"], json!(""));
        assert_eq!(result.processed_data()["age"], json!(7));
    }

    #[test]
    fn test_extra_keys_pass_through() {
        let form = form(json!({"type": "object", "properties": {"name": {"type": "string"}}}));
        let result = processor().process(&form, &data(json!({"name": "x", "extra": "y"})));

        assert_eq!(result.processed_data()["extra"], json!("y"));
        assert_eq!(result.processed_data()["name"], json!("x"));
    }

    #[test]
    fn test_absent_field_is_null() {
        let form = form(json!({"type": "object", "properties": {"nick": {"type": "string"}}}));
        let result = processor().process(&form, &Data::new());

        assert!(result.is_valid());
        assert_eq!(result.processed_data()["nick"], Value::Null);
    }

    #[test]
    fn test_unexpected_failure_is_isolated() {
        let form = form(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
        }));
        let processor =
            FormDataProcessor::new(&FormworkConfig::quiet(), Arc::new(Exploding)).unwrap();
        let result = processor.process(&form, &data(json!({"a": "boom", "b": "fine"})));

        assert!(!result.is_valid());
        assert_eq!(
            result.field_errors("a"),
            &["Rule execution failed: engine exploded".to_string()]
        );
        assert_eq!(result.processed_data()["a"], json!("boom"));
        assert_eq!(result.processed_data()["b"], json!("fine"));
    }

    #[test]
    fn test_logs_rejections_and_unknown_required_names() {
        let form = form(json!({
            "type": "object",
            "properties": {"email": {"type": "string", "format": "email"}},
            "required": ["email", "ghost"]
        }));
        let logger = Logger::capturing(Severity::Warn);
        let processor = processor().with_logger(logger.clone());
        processor.process(&form, &data(json!({"email": "nope"})));

        let lines = logger.captured();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("FORM_REQUIRED_NAME_UNKNOWN"));
        assert!(lines[0].contains("ghost"));
        assert!(lines[1].contains("FIELD_REJECTED"));
        assert!(lines[1].contains("\"field\":\"email\""));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FormworkConfig::default().with_max_schema_depth(0);
        assert!(FormDataProcessor::with_standard_engine(&config).is_err());
    }
}
