//! Observability subsystem
//!
//! Structured JSON logging of compilation and processing events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on processing
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use formwork::observability::{Event, Logger, Severity};
//!
//! let logger = Logger::new(Severity::Info);
//! logger.event(Event::FieldRejected, &[("field", "email")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
