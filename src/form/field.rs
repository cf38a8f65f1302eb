use crate::schema::PropertySchema;

use super::uischema::Control;

/// One top-level property of a form with the control rendering it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    schema: &'a PropertySchema,
    control: Option<&'a Control>,
}

impl<'a> Field<'a> {
    pub fn new(schema: &'a PropertySchema, control: Option<&'a Control>) -> Self {
        Self { schema, control }
    }

    pub fn name(&self) -> &'a str {
        self.schema.name()
    }

    pub fn schema(&self) -> &'a PropertySchema {
        self.schema
    }

    pub fn control(&self) -> Option<&'a Control> {
        self.control
    }

    /// The control's `type` option, if any
    pub fn control_type(&self) -> Option<&'a str> {
        self.control.and_then(Control::control_type)
    }
}
