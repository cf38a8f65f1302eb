//! UI schema elements
//!
//! Only the parts that feed rule compilation are modelled: the element tree,
//! control scopes and control options. Elements are parsed through a
//! discriminator table; unknown `type`s are rejected.

use serde_json::{Map, Value};

use super::errors::{FormError, FormResult};

const SCOPE_PREFIX: &str = "#/properties/";
const SCOPE_SEPARATOR: &str = "/properties/";

type ElementParser = fn(&Map<String, Value>, &str, usize, usize) -> FormResult<UiElement>;

const UI_ELEMENT_PARSERS: &[(&str, ElementParser)] = &[
    ("VerticalLayout", parse_vertical_layout),
    ("HorizontalLayout", parse_horizontal_layout),
    ("Group", parse_group),
    ("Categorization", parse_categorization),
    ("Category", parse_category),
    ("Control", parse_control),
    ("Label", parse_label),
];

/// Container of child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub label: Option<String>,
    pub elements: Vec<UiElement>,
    pub options: Map<String, Value>,
}

/// Binds a widget to one schema property
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    scope: String,
    /// String label, or `false` to hide it
    pub label: Option<Value>,
    pub options: Map<String, Value>,
}

impl Control {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            label: None,
            options: Map::new(),
        }
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Widget type from the `type` option (`editor`, `file`, `image`, ...)
    pub fn control_type(&self) -> Option<&str> {
        self.options.get("type").and_then(Value::as_str)
    }

    /// Property names along the scope, outermost first.
    ///
    /// `#/properties/address/properties/city` yields `["address", "city"]`.
    pub fn property_path(&self) -> FormResult<Vec<String>> {
        let rest = self
            .scope
            .strip_prefix(SCOPE_PREFIX)
            .ok_or_else(|| FormError::InvalidScope(self.scope.clone()))?;

        let path: Vec<String> = rest
            .split(SCOPE_SEPARATOR)
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect();

        if path.iter().any(|segment| segment.is_empty()) {
            return Err(FormError::InvalidScope(self.scope.clone()));
        }
        Ok(path)
    }

    /// Name of the top-level property this control binds, if it binds one
    pub fn top_level_property(&self) -> Option<String> {
        match self.property_path() {
            Ok(mut path) if path.len() == 1 => path.pop(),
            _ => None,
        }
    }
}

/// Static text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
}

/// One node of the UI schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum UiElement {
    VerticalLayout(Section),
    HorizontalLayout(Section),
    Group(Section),
    Categorization(Section),
    Category(Section),
    Control(Control),
    Label(Label),
}

impl UiElement {
    /// Parses a UI schema tree, bounding nesting at `max_depth`.
    pub fn from_value(value: &Value, max_depth: usize) -> FormResult<Self> {
        parse_element(value, "#", 0, max_depth)
    }

    /// The `type` discriminator
    pub fn element_type(&self) -> &'static str {
        match self {
            UiElement::VerticalLayout(_) => "VerticalLayout",
            UiElement::HorizontalLayout(_) => "HorizontalLayout",
            UiElement::Group(_) => "Group",
            UiElement::Categorization(_) => "Categorization",
            UiElement::Category(_) => "Category",
            UiElement::Control(_) => "Control",
            UiElement::Label(_) => "Label",
        }
    }

    /// Child elements; empty for leaves
    pub fn elements(&self) -> &[UiElement] {
        match self {
            UiElement::VerticalLayout(s)
            | UiElement::HorizontalLayout(s)
            | UiElement::Group(s)
            | UiElement::Categorization(s)
            | UiElement::Category(s) => &s.elements,
            UiElement::Control(_) | UiElement::Label(_) => &[],
        }
    }

    /// All controls, depth-first in document order
    pub fn controls(&self) -> Vec<&Control> {
        let mut found = Vec::new();
        self.collect_controls(&mut found);
        found
    }

    fn collect_controls<'a>(&'a self, found: &mut Vec<&'a Control>) {
        if let UiElement::Control(control) = self {
            found.push(control);
        }
        for child in self.elements() {
            child.collect_controls(found);
        }
    }

    /// Control bound to the top-level property `name`
    pub fn control_for(&self, name: &str) -> Option<&Control> {
        self.controls()
            .into_iter()
            .find(|c| c.top_level_property().as_deref() == Some(name))
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.element_type().into()));
        match self {
            UiElement::Control(control) => {
                map.insert("scope".into(), Value::String(control.scope.clone()));
                if let Some(label) = &control.label {
                    map.insert("label".into(), label.clone());
                }
                if !control.options.is_empty() {
                    map.insert("options".into(), Value::Object(control.options.clone()));
                }
            }
            UiElement::Label(label) => {
                map.insert("text".into(), Value::String(label.text.clone()));
            }
            UiElement::VerticalLayout(s)
            | UiElement::HorizontalLayout(s)
            | UiElement::Group(s)
            | UiElement::Categorization(s)
            | UiElement::Category(s) => {
                if let Some(label) = &s.label {
                    map.insert("label".into(), Value::String(label.clone()));
                }
                let elements = s.elements.iter().map(UiElement::to_value).collect();
                map.insert("elements".into(), Value::Array(elements));
                if !s.options.is_empty() {
                    map.insert("options".into(), Value::Object(s.options.clone()));
                }
            }
        }
        Value::Object(map)
    }
}

fn parse_element(
    value: &Value,
    path: &str,
    depth: usize,
    max_depth: usize,
) -> FormResult<UiElement> {
    if depth > max_depth {
        return Err(FormError::ui(
            path,
            format!("nesting exceeds maximum depth of {}", max_depth),
        ));
    }

    let map = value
        .as_object()
        .ok_or_else(|| FormError::ui(path, "element must be an object"))?;

    let element_type = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| FormError::ui(path, "element has no 'type'"))?;

    let parser = UI_ELEMENT_PARSERS
        .iter()
        .find(|(name, _)| *name == element_type)
        .map(|(_, parser)| *parser)
        .ok_or_else(|| FormError::UnknownElement {
            element_type: element_type.to_string(),
            path: path.to_string(),
        })?;

    parser(map, path, depth, max_depth)
}

fn parse_section(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max_depth: usize,
) -> FormResult<Section> {
    let label = match map.get("label") {
        Some(Value::String(label)) => Some(label.clone()),
        Some(_) => return Err(FormError::ui(path, "'label' must be a string")),
        None => None,
    };

    let elements = match map.get("elements") {
        Some(Value::Array(children)) => children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let child_path = format!("{}/elements/{}", path, i);
                parse_element(child, &child_path, depth + 1, max_depth)
            })
            .collect::<FormResult<Vec<_>>>()?,
        Some(_) => return Err(FormError::ui(path, "'elements' must be an array")),
        None => Vec::new(),
    };

    Ok(Section {
        label,
        elements,
        options: parse_options(map, path)?,
    })
}

fn parse_options(map: &Map<String, Value>, path: &str) -> FormResult<Map<String, Value>> {
    match map.get("options") {
        Some(Value::Object(options)) => Ok(options.clone()),
        Some(_) => Err(FormError::ui(path, "'options' must be an object")),
        None => Ok(Map::new()),
    }
}

fn parse_vertical_layout(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max: usize,
) -> FormResult<UiElement> {
    Ok(UiElement::VerticalLayout(parse_section(map, path, depth, max)?))
}

fn parse_horizontal_layout(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max: usize,
) -> FormResult<UiElement> {
    Ok(UiElement::HorizontalLayout(parse_section(map, path, depth, max)?))
}

fn parse_group(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max: usize,
) -> FormResult<UiElement> {
    Ok(UiElement::Group(parse_section(map, path, depth, max)?))
}

fn parse_categorization(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max: usize,
) -> FormResult<UiElement> {
    let section = parse_section(map, path, depth, max)?;
    if section.elements.iter().any(|e| !matches!(e, UiElement::Category(_))) {
        return Err(FormError::ui(
            path,
            "a Categorization may only contain Category elements",
        ));
    }
    Ok(UiElement::Categorization(section))
}

fn parse_category(
    map: &Map<String,
    Value>,
    path: &str,
    depth: usize,
    max: usize,
) -> FormResult<UiElement> {
    Ok(UiElement::Category(parse_section(map, path, depth, max)?))
}

fn parse_control(
    map: &Map<String,
    Value>,
    path: &str,
    _depth: usize,
    _max: usize,
) -> FormResult<UiElement> {
    let scope = map
        .get("scope")
        .and_then(Value::as_str)
        .ok_or_else(|| FormError::ui(path, "a Control needs a string 'scope'"))?;

    let label = match map.get("label") {
        Some(label @ (Value::String(_) | Value::Bool(_))) => Some(label.clone()),
        Some(_) => return Err(FormError::ui(path, "'label' must be a string or boolean")),
        None => None,
    };

    let control = Control {
        scope: scope.to_string(),
        label,
        options: parse_options(map, path)?,
    };
    // Reject malformed scopes early; resolution against the schema happens in `Form`.
    control.property_path()?;
    Ok(UiElement::Control(control))
}

fn parse_label(
    map: &Map<String,
    Value>,
    path: &str,
    _depth: usize,
    _max: usize,
) -> FormResult<UiElement> {
    let text = map
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| FormError::ui(path, "a Label needs a string 'text'"))?;
    Ok(UiElement::Label(Label { text: text.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> UiElement {
        UiElement::from_value(
            &json!({
                "type": "VerticalLayout",
                "elements": [
                    {"type": "Label", "text": "Profile"},
                    {"type": "Control", "scope": "#/properties/name"},
                    {
                        "type": "Group",
                        "label": "Address",
                        "elements": [
                            {"type": "Control", "scope": "#/properties/address/properties/city"},
                            {
                                "type": "Control",
                                "scope": "#/properties/bio",
                                "options": {"type": "editor"}
                            }
                        ]
                    }
                ]
            }),
            16,
        )
        .unwrap()
    }

    #[test]
    fn test_controls_in_document_order() {
        let ui = sample();
        let scopes: Vec<&str> = ui.controls().iter().map(|c| c.scope()).collect();
        assert_eq!(
            scopes,
            vec!["#/properties/name", "#/properties/address/properties/city", "#/properties/bio"]
        );
    }

    #[test]
    fn test_control_for_top_level_only() {
        let ui = sample();
        assert_eq!(ui.control_for("bio").unwrap().control_type(), Some("editor"));
        assert!(ui.control_for("city").is_none());
        assert!(ui.control_for("address").is_none());
    }

    #[test]
    fn test_property_path() {
        let control = Control::new("#/properties/address/properties/city");
        assert_eq!(control.property_path().unwrap(), vec!["address", "city"]);

        let escaped = Control::new("#/properties/a~1b");
        assert_eq!(escaped.property_path().unwrap(), vec!["a/b"]);

        assert!(Control::new("#/definitions/x").property_path().is_err());
        assert!(Control::new("#/properties/").property_path().is_err());
    }

    #[test]
    fn test_unknown_element_rejected() {
        let err = UiElement::from_value(&json!({"type": "Carousel"}), 16).unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownElement {
                element_type: "Carousel".into(),
                path: "#".into()
            }
        );
    }

    #[test]
    fn test_control_requires_scope() {
        let err = UiElement::from_value(&json!({"type": "Control"}), 16).unwrap_err();
        assert!(matches!(err, FormError::MalformedUiSchema { .. }));
    }

    #[test]
    fn test_categorization_children() {
        let ok = UiElement::from_value(
            &json!({
                "type": "Categorization",
                "elements": [{"type": "Category", "label": "One", "elements": []}]
            }),
            16,
        );
        assert!(ok.is_ok());

        let bad = UiElement::from_value(
            &json!({
                "type": "Categorization",
                "elements": [{"type": "Label", "text": "x"}]
            }),
            16,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_depth_guard() {
        let mut value = json!({"type": "Control", "scope": "#/properties/a"});
        for _ in 0..6 {
            value = json!({"type": "VerticalLayout", "elements": [value]});
        }
        assert!(UiElement::from_value(&value, 3).is_err());
        assert!(UiElement::from_value(&value, 10).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let first = sample().to_value();
        let second = UiElement::from_value(&first, 16).unwrap().to_value();
        assert_eq!(first, second);
    }
}
