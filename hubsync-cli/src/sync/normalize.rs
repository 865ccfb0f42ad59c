//! Value normalizers applied to cells on their way into the sheet

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;

use super::columns::STATE_ABBREVIATIONS;
use crate::sheet::model::CellValue;

/// Numeric timestamps below this are seconds, at or above milliseconds.
const MS_THRESHOLD: f64 = 2e10;

/// Normalize a phone number to `(NNN) NNN-NNNN` where possible.
/// US numbers with a leading country 1 lose it; other international
/// numbers keep a bare `+` plus digits; anything else passes through.
pub fn normalize_phone(value: &str) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return String::new();
    }

    let has_plus = raw.starts_with('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        return format_us_phone(&digits);
    }
    if digits.len() == 11 && digits.starts_with('1') {
        return format_us_phone(&digits[1..]);
    }
    if has_plus {
        return format!("+{}", digits);
    }
    raw.to_string()
}

fn format_us_phone(digits: &str) -> String {
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
}

/// Normalize a state to its USPS code. Two-character values are
/// uppercased as-is, full names go through the table, and anything
/// unrecognized passes through trimmed.
pub fn normalize_state(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let upper = trimmed.to_uppercase();
    if upper.chars().count() == 2 {
        return upper;
    }
    match STATE_ABBREVIATIONS.get(upper.as_str()) {
        Some(code) => (*code).to_string(),
        None => trimmed.to_string(),
    }
}

/// Parse a property into a datetime cell. Positive numbers are unix
/// timestamps (seconds or milliseconds by magnitude), everything else
/// goes through a chain of common formats. Unparseable values come back
/// as the original text so nothing is silently dropped.
pub fn parse_any_date(value: &str) -> CellValue {
    let trimmed = value.trim();

    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() && n > 0.0 {
            if (MS_THRESHOLD / 2.0..MS_THRESHOLD * 2.0).contains(&n) {
                warn!(
                    "Timestamp {} is within a factor of two of the seconds/milliseconds cutoff",
                    trimmed
                );
            }
            let millis = if n < MS_THRESHOLD { n * 1000.0 } else { n };
            return match DateTime::from_timestamp_millis(millis as i64) {
                Some(dt) => CellValue::DateTime(dt),
                None => CellValue::from_text(value.to_string()),
            };
        }
    }

    match parse_date_string(trimmed) {
        Some(dt) => CellValue::DateTime(dt),
        None => CellValue::from_text(value.to_string()),
    }
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }
    None
}

/// Join first and last name, skipping blank parts.
pub fn build_full_name(first: &str, last: &str) -> String {
    let parts: Vec<&str> = [first.trim(), last.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ten_digit_phones() {
        assert_eq!(normalize_phone("4155551234"), "(415) 555-1234");
        assert_eq!(normalize_phone("415-555-1234"), "(415) 555-1234");
        assert_eq!(normalize_phone("(415) 555.1234"), "(415) 555-1234");
    }

    #[test]
    fn strips_leading_one_from_eleven_digit_phones() {
        assert_eq!(normalize_phone("14155551234"), "(415) 555-1234");
        // the 11-digit rule wins over the plus prefix
        assert_eq!(normalize_phone("+1 415 555 1234"), "(415) 555-1234");
    }

    #[test]
    fn keeps_international_numbers_with_plus() {
        assert_eq!(normalize_phone("+44 20 7946 0958"), "+442079460958");
    }

    #[test]
    fn passes_through_unrecognized_phone_shapes() {
        assert_eq!(normalize_phone(" 555-1234 "), "555-1234");
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("   "), "");
    }

    #[test]
    fn abbreviates_full_state_names() {
        assert_eq!(normalize_state("California"), "CA");
        assert_eq!(normalize_state("  california "), "CA");
        assert_eq!(normalize_state("District of Columbia"), "DC");
    }

    #[test]
    fn uppercases_two_letter_codes() {
        assert_eq!(normalize_state("ca"), "CA");
        assert_eq!(normalize_state("Tx"), "TX");
    }

    #[test]
    fn passes_through_unknown_states_trimmed() {
        assert_eq!(normalize_state(" Puerto Rico "), "Puerto Rico");
        assert_eq!(normalize_state("Californias"), "Californias");
        assert_eq!(normalize_state(""), "");
    }

    #[test]
    fn parses_unix_seconds_and_milliseconds() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(parse_any_date("1700000000"), CellValue::DateTime(expected));
        assert_eq!(
            parse_any_date("1700000000000"),
            CellValue::DateTime(expected)
        );

        // above the cutoff the value is already milliseconds
        let millis = DateTime::from_timestamp_millis(30_000_000_000).unwrap();
        assert_eq!(parse_any_date("30000000000"), CellValue::DateTime(millis));
    }

    #[test]
    fn parses_common_date_strings() {
        assert_eq!(
            parse_any_date("2024-01-15"),
            CellValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_any_date("2024-01-15T10:30:00Z"),
            CellValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_any_date("01/15/2024"),
            CellValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn returns_unparseable_values_unchanged() {
        assert_eq!(
            parse_any_date("not a date"),
            CellValue::Text("not a date".into())
        );
        assert_eq!(parse_any_date("-5"), CellValue::Text("-5".into()));
    }

    #[test]
    fn builds_full_names_from_nonempty_parts() {
        assert_eq!(build_full_name("Ana", "Alvarez"), "Ana Alvarez");
        assert_eq!(build_full_name("  Ana  ", ""), "Ana");
        assert_eq!(build_full_name("", "Alvarez"), "Alvarez");
        assert_eq!(build_full_name("", ""), "");
    }
}
