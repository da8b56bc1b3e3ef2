//! Datetime parsing and formatting with strftime-style patterns.
//!
//! Parsing fills in the fields a pattern leaves out the way `strptime` does:
//! the date defaults to 1900-01-01 and the time to midnight, field by field.
//! `%Y` alone gives January 1st of that year, `%H:%M` alone gives that time
//! on 1900-01-01.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use chrono::format::{Item, ParseResult, Parsed, StrftimeItems};

use crate::error::{ConvertError, Result};

/// Pattern used when the caller supplies none.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Year used when a pattern has no year field.
const DEFAULT_YEAR: i64 = 1900;

/// Parses `value` according to `format`.
///
/// # Examples
///
/// ```
/// use helios_convert::datetime::{str_to_datetime, DEFAULT_FORMAT};
///
/// let dt = str_to_datetime("2023-05-15 14:30:00", DEFAULT_FORMAT)?;
/// assert_eq!(dt.to_string(), "2023-05-15 14:30:00");
///
/// let year_only = str_to_datetime("2023", "%Y")?;
/// assert_eq!(year_only.to_string(), "2023-01-01 00:00:00");
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn str_to_datetime(value: &str, format: &str) -> Result<NaiveDateTime> {
    let items = validate_format(format)?;
    let mismatch = |e: chrono::ParseError| {
        ConvertError::conversion(
            value,
            "datetime",
            format!("does not match format '{}': {}", format, e),
        )
    };

    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, value, items.iter()).map_err(mismatch)?;
    fill_defaults(&mut parsed).map_err(mismatch)?;
    parsed.to_naive_datetime_with_offset(0).map_err(mismatch)
}

/// Sets every date and time field the pattern did not supply.
///
/// Dates given another way (ordinal day, week number, Unix timestamp) are
/// left for chrono to resolve.
fn fill_defaults(parsed: &mut Parsed) -> ParseResult<()> {
    if parsed.timestamp().is_some() {
        return Ok(());
    }

    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some()
        || parsed.isoyear_div_100().is_some()
        || parsed.isoyear_mod_100().is_some();
    if !has_year {
        parsed.set_year(DEFAULT_YEAR)?;
    }

    let has_day_of_year = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !has_day_of_year {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // %I without %p reads as AM
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), None) => parsed.set_hour12(12)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

/// Formats `value` according to `format`.
pub fn datetime_to_str(value: &NaiveDateTime, format: &str) -> Result<String> {
    let items = validate_format(format)?;
    let mut rendered = String::new();
    write!(rendered, "{}", value.format_with_items(items.into_iter())).map_err(|_| {
        ConvertError::conversion(
            value.to_string(),
            "string",
            format!("format '{}' needs fields a naive datetime does not have", format),
        )
    })?;
    Ok(rendered)
}

/// Checks that `format` is a well-formed strftime pattern.
fn validate_format(format: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ConvertError::invalid_option(
            "format",
            format!("'{}' is not a valid datetime pattern", format),
        ));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::NaiveDate;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_default_format() -> Result<()> {
        assert_eq!(
            str_to_datetime("2023-05-15 14:30:00", DEFAULT_FORMAT)?,
            ymd_hms(2023, 5, 15, 14, 30, 0)
        );
        Ok(())
    }

    #[test]
    fn test_parse_date_only_is_midnight() -> Result<()> {
        assert_eq!(
            str_to_datetime("15/05/2023", "%d/%m/%Y")?,
            ymd_hms(2023, 5, 15, 0, 0, 0)
        );
        Ok(())
    }

    #[test]
    fn test_parse_time_only_defaults_date() -> Result<()> {
        assert_eq!(
            str_to_datetime("14:30", "%H:%M")?,
            ymd_hms(1900, 1, 1, 14, 30, 0)
        );
        Ok(())
    }

    #[test]
    fn test_parse_partial_dates() -> Result<()> {
        assert_eq!(str_to_datetime("2023", "%Y")?, ymd_hms(2023, 1, 1, 0, 0, 0));
        assert_eq!(str_to_datetime("2023-05", "%Y-%m")?, ymd_hms(2023, 5, 1, 0, 0, 0));
        assert_eq!(str_to_datetime("05/2023", "%m/%Y")?, ymd_hms(2023, 5, 1, 0, 0, 0));
        assert_eq!(str_to_datetime("15 May", "%d %b")?, ymd_hms(1900, 5, 15, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_parse_partial_times() -> Result<()> {
        assert_eq!(
            str_to_datetime("2023-05-15 14", "%Y-%m-%d %H")?,
            ymd_hms(2023, 5, 15, 14, 0, 0)
        );
        assert_eq!(str_to_datetime("03:15", "%I:%M")?, ymd_hms(1900, 1, 1, 3, 15, 0));
        assert_eq!(
            str_to_datetime("03:15 PM", "%I:%M %p")?,
            ymd_hms(1900, 1, 1, 15, 15, 0)
        );
        Ok(())
    }

    #[test]
    fn test_parse_ordinal_day() -> Result<()> {
        assert_eq!(str_to_datetime("2023-032", "%Y-%j")?, ymd_hms(2023, 2, 1, 0, 0, 0));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        let err = str_to_datetime("2023-02-30", "%Y-%m-%d").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(str_to_datetime("2023-05-15 14:30:00 extra", DEFAULT_FORMAT).is_err());
    }

    #[test]
    fn test_parse_mismatch() {
        let err = str_to_datetime("15 May 2023", DEFAULT_FORMAT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().contains("%Y-%m-%d %H:%M:%S"));
    }

    #[test]
    fn test_format() -> Result<()> {
        let dt = ymd_hms(2023, 5, 15, 14, 30, 0);
        assert_eq!(datetime_to_str(&dt, DEFAULT_FORMAT)?, "2023-05-15 14:30:00");
        assert_eq!(datetime_to_str(&dt, "%d.%m.%Y")?, "15.05.2023");
        Ok(())
    }

    #[test]
    fn test_invalid_patterns_do_not_panic() {
        let dt = ymd_hms(2023, 5, 15, 14, 30, 0);
        assert!(datetime_to_str(&dt, "%Y-%").is_err());
        assert!(datetime_to_str(&dt, "%z").is_err());
        assert!(str_to_datetime("2023", "%Y%").is_err());
    }
}
