//! Form model
//!
//! Forms, their data and the parts of the UI schema that feed rule
//! compilation. Nothing here renders.

mod data;
mod errors;
mod field;
#[allow(clippy::module_inception)]
mod form;
mod uischema;

pub use data::Data;
pub use errors::{FormError, FormResult};
pub use field::Field;
pub use form::Form;
pub use uischema::{Control, Label, Section, UiElement};
