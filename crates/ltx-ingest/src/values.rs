//! Cell parsing for registry extracts.
//!
//! Every parser returns `None` for blank, missing-value markers or
//! unparseable input. Nothing here fails: a bad cell is an absent value.

use chrono::NaiveDate;

/// Markers statistical packages write for missing values.
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NAN", "NULL", "NAT", "."];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Trims a cell, returning `None` when it holds no value.
pub fn non_empty(cell: Option<&str>) -> Option<&str> {
    let trimmed = cell?.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        None
    } else {
        Some(trimmed)
    }
}

/// Owned text of a non-empty cell.
pub fn parse_text(cell: Option<&str>) -> Option<String> {
    non_empty(cell).map(str::to_string)
}

/// Parses a finite number.
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    non_empty(cell)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a 0/1 style indicator.
pub fn parse_flag(cell: Option<&str>) -> Option<bool> {
    let value = non_empty(cell)?;
    match value.to_ascii_uppercase().as_str() {
        "1" | "Y" | "YES" | "T" | "TRUE" => Some(true),
        "0" | "N" | "NO" | "F" | "FALSE" => Some(false),
        _ => match value.parse::<f64>().ok()? {
            n if n == 1.0 => Some(true),
            n if n == 0.0 => Some(false),
            _ => None,
        },
    }
}

/// Parses a calendar date, ignoring any time-of-day component.
pub fn parse_date(cell: Option<&str>) -> Option<NaiveDate> {
    let value = non_empty(cell)?;
    let date_part = value.split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some("nan")), None);
        assert_eq!(non_empty(Some(".")), None);
        assert_eq!(non_empty(Some(" CAOP ")), Some("CAOP"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("1825")), Some(1825.0));
        assert_eq!(parse_number(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(Some("")), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(Some("1")), Some(true));
        assert_eq!(parse_flag(Some("1.0")), Some(true));
        assert_eq!(parse_flag(Some("0.0")), Some(false));
        assert_eq!(parse_flag(Some("Y")), Some(true));
        assert_eq!(parse_flag(Some("false")), Some(false));
        assert_eq!(parse_flag(Some("2")), None);
        assert_eq!(parse_flag(Some("")), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 9);
        assert_eq!(parse_date(Some("2023-03-09")), expected);
        assert_eq!(parse_date(Some("2023-03-09 00:00:00")), expected);
        assert_eq!(parse_date(Some("2023-03-09T14:30:00")), expected);
        assert_eq!(parse_date(Some("03/09/2023")), expected);
        assert_eq!(parse_date(Some("2023-02-30")), None);
        assert_eq!(parse_date(Some("NaT")), None);
    }
}
