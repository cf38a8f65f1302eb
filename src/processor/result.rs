//! Result of processing one submission

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::form::{Data, Form};

/// Outcome of one `process` call. Immutable once built.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Processed values, raw values for rejected fields, extra keys as given
    processed_data: Map<String, Value>,
    /// Messages per rejected field
    errors: BTreeMap<String, Vec<String>>,
    is_valid: bool,
    /// The form that was processed
    source: Form,
    /// `source` carrying `processed_data`, built on first use
    derived: OnceLock<Form>,
}

impl ProcessResult {
    /// Creates a result; it is valid exactly when `errors` is empty.
    pub fn new(
        source: &Form,
        processed_data: Map<String, Value>,
        errors: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            processed_data,
            errors,
            source: source.clone(),
            derived: OnceLock::new(),
        }
    }

    pub fn processed_data(&self) -> &Map<String, Value> {
        &self.processed_data
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every message, field by field
    pub fn all_errors(&self) -> Vec<&str> {
        self.errors
            .values()
            .flat_map(|messages| messages.iter().map(String::as_str))
            .collect()
    }

    /// Messages for one field; empty if it was accepted
    pub fn field_errors(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_field_errors(&self, name: &str) -> bool {
        !self.field_errors(name).is_empty()
    }

    /// The processed form carrying the processed data, valid or not.
    ///
    /// Built once from the processed form's `with_data`; the processed form
    /// itself is never changed.
    pub fn form(&self) -> &Form {
        self.derived.get_or_init(|| {
            self.source
                .with_data(Data::from_map(self.processed_data.clone()))
        })
    }
}
