use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::ZugferdError;

/// Format a decimal with exactly `places` fractional digits and `.` as
/// separator. Rounds half away from zero.
pub fn format_decimal(value: Decimal, places: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded.to_string()
}

/// Parse a decimal as found in element text. `None` for anything that is
/// not a plain decimal number.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// `yyyymmdd`, the UN/CEFACT format code 102.
pub fn format_date_102(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `yyyy-mm-dd`, used by UBL.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `yyyy-mm-ddT00:00:00`, used for untyped ZUGFeRD 1.0 issue dates.
pub fn format_iso_datetime(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00").to_string()
}

/// Parse a date element value.
///
/// With a format code: `102` is `yyyymmdd`, `610` is `yyyymm` (first day of
/// the month), `616` is `yyyyww` (Monday of the ISO week). Any other code is
/// an error. Without a code the encoding is guessed from the length: 8
/// characters compact, 10 an ISO date, 19 an ISO date-time.
///
/// Values that do not match their encoding yield `Ok(None)`.
pub fn parse_date(text: &str, format_code: Option<&str>) -> Result<Option<NaiveDate>, ZugferdError> {
    let text = text.trim();
    let code = format_code.map(str::trim).filter(|c| !c.is_empty());
    match code {
        Some("102") => Ok(NaiveDate::parse_from_str(text, "%Y%m%d").ok()),
        Some("610") => Ok(parse_year_month(text)),
        Some("616") => Ok(parse_year_week(text)),
        Some(other) => Err(ZugferdError::UnsupportedDateFormat(other.to_string())),
        None => Ok(sniff_date(text)),
    }
}

fn parse_year_month(text: &str) -> Option<NaiveDate> {
    if text.len() != 6 || !text.is_ascii() {
        return None;
    }
    let year = text[..4].parse().ok()?;
    let month = text[4..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_year_week(text: &str) -> Option<NaiveDate> {
    if text.len() != 6 || !text.is_ascii() {
        return None;
    }
    let year = text[..4].parse().ok()?;
    let week = text[4..].parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

fn sniff_date(text: &str) -> Option<NaiveDate> {
    match text.len() {
        8 => NaiveDate::parse_from_str(text, "%Y%m%d").ok(),
        10 => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok(),
        19 => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|dt| dt.date()),
        _ => text
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()),
    }
}

/// Year and ISO week number of a date, as written with format code 616.
pub fn format_year_week(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}{:02}", week.year(), week.week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(1234.5), 2), "1234.50");
        assert_eq!(format_decimal(dec!(100), 2), "100.00");
        assert_eq!(format_decimal(dec!(49.90), 2), "49.90");
        assert_eq!(format_decimal(dec!(0.005), 2), "0.01");
        assert_eq!(format_decimal(dec!(-0.005), 2), "-0.01");
        assert_eq!(format_decimal(dec!(19), 4), "19.0000");
        assert_eq!(format_decimal(dec!(1.23456), 4), "1.2346");
        assert_eq!(format_decimal(dec!(7.5), 0), "8");
    }

    #[test]
    fn parse_decimal_cases() {
        assert_eq!(parse_decimal(" 1234.50 "), Some(dec!(1234.50)));
        assert_eq!(parse_decimal("-3"), Some(dec!(-3)));
        assert_eq!(parse_decimal("1e2"), Some(dec!(100)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("12,50"), None);
    }

    #[test]
    fn date_format_codes() {
        assert_eq!(parse_date("20240615", Some("102")).unwrap(), Some(date(2024, 6, 15)));
        assert_eq!(parse_date("202406", Some("610")).unwrap(), Some(date(2024, 6, 1)));
        // ISO week 1 of 2024 starts on Monday 1 January.
        assert_eq!(parse_date("202401", Some("616")).unwrap(), Some(date(2024, 1, 1)));
        assert_eq!(parse_date("202424", Some("616")).unwrap(), Some(date(2024, 6, 10)));
    }

    #[test]
    fn unknown_format_code_is_an_error() {
        let err = parse_date("20240615", Some("203")).unwrap_err();
        assert!(matches!(err, ZugferdError::UnsupportedDateFormat(code) if code == "203"));
    }

    #[test]
    fn sniffing_without_format_code() {
        assert_eq!(parse_date("20240615", None).unwrap(), Some(date(2024, 6, 15)));
        assert_eq!(parse_date("2024-06-15", None).unwrap(), Some(date(2024, 6, 15)));
        assert_eq!(parse_date("2024-06-15T13:45:00", None).unwrap(), Some(date(2024, 6, 15)));
        assert_eq!(parse_date("2024-06-15T13:45:00+02:00", None).unwrap(), Some(date(2024, 6, 15)));
        assert_eq!(parse_date("15.06.2024", None).unwrap(), None);
        assert_eq!(parse_date("", Some("")).unwrap(), None);
    }

    #[test]
    fn malformed_value_is_absent_not_an_error() {
        assert_eq!(parse_date("2024-06-15", Some("102")).unwrap(), None);
        assert_eq!(parse_date("2024", Some("610")).unwrap(), None);
    }

    #[test]
    fn date_writers() {
        let d = date(2024, 1, 5);
        assert_eq!(format_date_102(d), "20240105");
        assert_eq!(format_iso_date(d), "2024-01-05");
        assert_eq!(format_iso_datetime(d), "2024-01-05T00:00:00");
        assert_eq!(format_year_week(date(2024, 6, 12)), "202424");
    }
}
