//! Form data processing
//!
//! `FormDataProcessor::process` compiles a form's rules, runs each field
//! through the rule engine and returns an immutable `ProcessResult`.

#[allow(clippy::module_inception)]
mod processor;
mod result;

pub use processor::FormDataProcessor;
pub use result::ProcessResult;
