//! Regular expressions shared by value types and the standard rule engine

pub(crate) const EMAIL: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

pub(crate) const URL: &str = r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://[^\s/?#]+(?:[/?#][^\s]*)?$";

pub(crate) const HOSTNAME: &str = r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

pub(crate) const PHONE: &str = r"^\+?[0-9][0-9 ().-]{5,19}$";

pub(crate) const TAG: &str = r"<[^>]*>";

/// Returns true for an optionally signed run of ASCII digits
pub(crate) fn is_digit_string(value: &str) -> bool {
    let digits = value.strip_prefix(&['+', '-'][..]).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a finite decimal number
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_patterns_compile() {
        for pattern in [EMAIL, URL, HOSTNAME, PHONE, TAG] {
            assert!(Regex::new(pattern).is_ok(), "{}", pattern);
        }
    }

    #[test]
    fn test_digit_string() {
        assert!(is_digit_string("12345"));
        assert!(is_digit_string("-42"));
        assert!(is_digit_string("+7"));
        assert!(!is_digit_string(""));
        assert!(!is_digit_string("-"));
        assert!(!is_digit_string("4.2"));
        assert!(!is_digit_string("12a"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }
}
