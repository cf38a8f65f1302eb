//! Lookup tables driving the schema-to-rules mapping
//!
//! Kept as data so every mapping can be listed and tested on its own.

use super::rule_set::Phase;
use crate::schema::KindTag;

/// Cast token per scalar kind. Kinds not listed get no cast.
pub const CAST_TABLE: &[(KindTag, &str)] = &[
    (KindTag::String, "string"),
    (KindTag::Integer, "integer"),
    (KindTag::Number, "float"),
    (KindTag::Boolean, "boolean"),
];

/// Kind-level validator for numeric kinds
pub const NUMERIC_VALIDATOR_TABLE: &[(KindTag, &str)] =
    &[(KindTag::Integer, "int"), (KindTag::Number, "numeric")];

/// What a string `format` compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    /// A fixed token, possibly with an argument (`date_format:Y-m-d`)
    Token(&'static str),
    /// `regex:` with the configured phone pattern
    Phone,
}

pub const FORMAT_TABLE: &[(&str, FormatRule)] = &[
    ("email", FormatRule::Token("email")),
    ("uri", FormatRule::Token("url")),
    ("url", FormatRule::Token("url")),
    ("date", FormatRule::Token("date_format:Y-m-d")),
    ("date-time", FormatRule::Token("date_format:Y-m-d H:i:s")),
    ("time", FormatRule::Token("date_format:H:i:s")),
    ("tel", FormatRule::Phone),
    ("hostname", FormatRule::Token("hostname")),
    ("ipv4", FormatRule::Token("ip")),
    ("ipv6", FormatRule::Token("ip")),
    ("uuid", FormatRule::Token("uuid")),
    ("base64", FormatRule::Token("base64")),
    ("json", FormatRule::Token("json")),
];

/// Token for formats missing from `FORMAT_TABLE`
pub const DEFAULT_FORMAT_TOKEN: &str = "string";

pub const MEDIA_TYPE_TABLE: &[(&str, &str)] =
    &[("application/json", "json"), ("text/json", "json")];

/// Token for media types missing from `MEDIA_TYPE_TABLE`
pub const DEFAULT_MEDIA_TYPE_TOKEN: &str = "string";

/// Extra rules contributed by a UI control's `type` option
pub const CONTROL_TABLE: &[(&str, Phase, &str)] = &[
    ("editor", Phase::Transform, "strip_tags"),
    ("file", Phase::Validate, "file"),
    ("image", Phase::Validate, "image"),
];

pub fn cast_token(kind: KindTag) -> Option<&'static str> {
    lookup(CAST_TABLE, &kind)
}

pub fn numeric_validator(kind: KindTag) -> Option<&'static str> {
    lookup(NUMERIC_VALIDATOR_TABLE, &kind)
}

pub fn format_rule(format: &str) -> FormatRule {
    lookup(FORMAT_TABLE, &format).unwrap_or(FormatRule::Token(DEFAULT_FORMAT_TOKEN))
}

pub fn media_type_token(media_type: &str) -> &'static str {
    lookup(MEDIA_TYPE_TABLE, &media_type).unwrap_or(DEFAULT_MEDIA_TYPE_TOKEN)
}

pub fn control_rules(control_type: &str) -> impl Iterator<Item = (Phase, &'static str)> + '_ {
    CONTROL_TABLE
        .iter()
        .filter(move |(kind, _, _)| *kind == control_type)
        .map(|(_, phase, token)| (*phase, *token))
}

fn lookup<K: PartialEq, V: Copy>(table: &[(K, V)], key: &K) -> Option<V> {
    table.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_only_for_scalars() {
        assert_eq!(cast_token(KindTag::String), Some("string"));
        assert_eq!(cast_token(KindTag::Integer), Some("integer"));
        assert_eq!(cast_token(KindTag::Number), Some("float"));
        assert_eq!(cast_token(KindTag::Boolean), Some("boolean"));
        assert_eq!(cast_token(KindTag::Array), None);
        assert_eq!(cast_token(KindTag::Object), None);
        assert_eq!(cast_token(KindTag::Null), None);
    }

    #[test]
    fn test_format_table() {
        assert_eq!(format_rule("email"), FormatRule::Token("email"));
        assert_eq!(format_rule("uri"), FormatRule::Token("url"));
        assert_eq!(format_rule("date-time"), FormatRule::Token("date_format:Y-m-d H:i:s"));
        assert_eq!(format_rule("ipv6"), FormatRule::Token("ip"));
        assert_eq!(format_rule("tel"), FormatRule::Phone);
        assert_eq!(format_rule("color"), FormatRule::Token("string"));
    }

    #[test]
    fn test_media_types() {
        assert_eq!(media_type_token("application/json"), "json");
        assert_eq!(media_type_token("text/json"), "json");
        assert_eq!(media_type_token("text/html"), "string");
    }

    #[test]
    fn test_control_rules() {
        let editor: Vec<_> = control_rules("editor").collect();
        assert_eq!(editor, vec![(Phase::Transform, "strip_tags")]);
        assert_eq!(control_rules("slider").count(), 0);
    }

    #[test]
    fn test_numeric_validators() {
        assert_eq!(numeric_validator(KindTag::Integer), Some("int"));
        assert_eq!(numeric_validator(KindTag::Number), Some("numeric"));
        assert_eq!(numeric_validator(KindTag::String), None);
    }
}
