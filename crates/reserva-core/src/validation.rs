//! Input validation helpers
//!
//! Normalization used by the conversational transport before calling into the
//! booking core: phone/name cleanup and the date/time formats clients type.

use chrono::{NaiveDate, NaiveTime};

const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H.%M"];

/// Strips everything but digits; requires at least 10 of them.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.len() >= 10).then_some(digits)
}

/// Trimmed name of 2 to 100 characters.
pub fn normalize_client_name(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    (2..=100)
        .contains(&cleaned.chars().count())
        .then(|| cleaned.to_string())
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_strips_formatting() {
        assert_eq!(
            normalize_phone("+998 (90) 123-45-67").as_deref(),
            Some("998901234567")
        );
    }

    #[test]
    fn test_phone_too_short_is_rejected() {
        assert_eq!(normalize_phone("12345"), None);
    }

    #[test]
    fn test_name_is_trimmed_and_bounded() {
        assert_eq!(normalize_client_name("  Aziza  ").as_deref(), Some("Aziza"));
        assert_eq!(normalize_client_name(" a "), None);
        assert_eq!(normalize_client_name(&"x".repeat(101)), None);
    }

    #[test]
    fn test_parse_date_accepts_client_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(parse_date("04.03.2024"), Some(expected));
        assert_eq!(parse_date("2024-03-04"), Some(expected));
        assert_eq!(parse_date(" 04/03/2024 "), Some(expected));
        assert_eq!(parse_date("3rd of March"), None);
    }

    #[test]
    fn test_parse_time_accepts_client_formats() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_time("09:30"), Some(expected));
        assert_eq!(parse_time("09.30"), Some(expected));
        assert_eq!(parse_time("half past nine"), None);
    }
}
