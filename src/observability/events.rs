//! Observable events emitted while compiling and processing forms
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in formwork
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Compilation
    /// Rule sets compiled for every field of a form
    FormCompiled,
    /// A form-level required name matches no property
    RequiredNameUnknown,

    // Processing
    /// A field value failed validation
    FieldRejected,
    /// The rule engine failed unexpectedly on a field
    FieldFailed,
    /// All fields of a submission processed
    ProcessComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::FormCompiled => "FORM_COMPILED",
            Event::RequiredNameUnknown => "FORM_REQUIRED_NAME_UNKNOWN",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::FieldFailed => "FIELD_FAILED",
            Event::ProcessComplete => "PROCESS_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FormCompiled | Event::ProcessComplete => Severity::Trace,
            Event::RequiredNameUnknown | Event::FieldRejected => Severity::Warn,
            Event::FieldFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
