//! `date_format:<format>` support
//!
//! Formats use the letter syntax of the rule tokens (`Y-m-d H:i:s`), which is
//! translated to chrono's `%` syntax before parsing. A backslash makes the
//! next character literal.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::errors::{RuleFailure, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Date,
    Time,
    Timestamp,
}

const LETTERS: &[(char, &str, Part)] = &[
    ('Y', "%Y", Part::Date),
    ('y', "%y", Part::Date),
    ('m', "%m", Part::Date),
    ('n', "%m", Part::Date),
    ('d', "%d", Part::Date),
    ('j', "%d", Part::Date),
    ('D', "%a", Part::Date),
    ('l', "%A", Part::Date),
    ('M', "%b", Part::Date),
    ('F', "%B", Part::Date),
    ('H', "%H", Part::Time),
    ('G', "%H", Part::Time),
    ('h', "%I", Part::Time),
    ('g', "%I", Part::Time),
    ('i', "%M", Part::Time),
    ('s', "%S", Part::Time),
    ('A', "%p", Part::Time),
    ('a', "%p", Part::Time),
    ('U', "%s", Part::Timestamp),
];

/// A date format translated to chrono syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DateFormat {
    chrono: String,
    has_date: bool,
    has_time: bool,
    has_timestamp: bool,
}

impl DateFormat {
    pub(super) fn translate(format: &str) -> RuleResult<Self> {
        let mut translated = DateFormat {
            chrono: String::with_capacity(format.len() * 2),
            has_date: false,
            has_time: false,
            has_timestamp: false,
        };

        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(literal) => translated.push_literal(literal),
                    None => {
                        return Err(RuleFailure::unexpected(format!(
                            "date format '{}' ends with a bare escape",
                            format
                        )))
                    }
                }
                continue;
            }

            match LETTERS.iter().find(|(letter, _, _)| *letter == c) {
                Some((_, directive, part)) => {
                    translated.chrono.push_str(directive);
                    match part {
                        Part::Date => translated.has_date = true,
                        Part::Time => translated.has_time = true,
                        Part::Timestamp => translated.has_timestamp = true,
                    }
                }
                None => translated.push_literal(c),
            }
        }

        if !(translated.has_date || translated.has_time || translated.has_timestamp) {
            return Err(RuleFailure::unexpected(format!(
                "date format '{}' has no date or time fields",
                format
            )));
        }
        Ok(translated)
    }

    fn push_literal(&mut self, c: char) {
        if c == '%' {
            self.chrono.push_str("%%");
        } else {
            self.chrono.push(c);
        }
    }

    /// Returns true if the whole of `input` matches the format
    pub(super) fn matches(&self, input: &str) -> bool {
        if self.has_timestamp || (self.has_date && self.has_time) {
            NaiveDateTime::parse_from_str(input, &self.chrono).is_ok()
        } else if self.has_date {
            NaiveDate::parse_from_str(input, &self.chrono).is_ok()
        } else {
            NaiveTime::parse_from_str(input, &self.chrono).is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(format: &str, input: &str) -> bool {
        DateFormat::translate(format).unwrap().matches(input)
    }

    #[test]
    fn test_translation() {
        let format = DateFormat::translate("Y-m-d H:i:s").unwrap();
        assert_eq!(format.chrono, "%Y-%m-%d %H:%M:%S");
        assert_eq!(DateFormat::translate("d.m.Y \\a\\t H:i").unwrap().chrono, "%d.%m.%Y at %H:%M");
    }

    #[test]
    fn test_date_formats() {
        assert!(matches("Y-m-d", "2024-02-29"));
        assert!(!matches("Y-m-d", "2023-02-29"));
        assert!(!matches("Y-m-d", "2024-02-29T10:00"));
        assert!(!matches("Y-m-d", "29/02/2024"));
    }

    #[test]
    fn test_datetime_and_time_formats() {
        assert!(matches("Y-m-d H:i:s", "2024-01-15 09:30:00"));
        assert!(!matches("Y-m-d H:i:s", "2024-01-15"));
        assert!(matches("H:i:s", "23:59:59"));
        assert!(!matches("H:i:s", "24:00:00"));
        assert!(matches("U", "1700000000"));
    }

    #[test]
    fn test_invalid_formats() {
        assert!(DateFormat::translate("---").is_err());
        assert!(DateFormat::translate("Y\\").is_err());
    }
}
