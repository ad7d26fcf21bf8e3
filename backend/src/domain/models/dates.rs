use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::errors::{EngineError, EngineResult};

/// Parse a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
/// Timestamps keep the calendar date of their own offset.
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| EngineError::invalid(field, format!("'{}' is not a valid date", value)))
}

/// Parse a timestamp given as RFC 3339 or as a bare date (midnight UTC)
pub fn parse_timestamp(field: &str, value: &str) -> EngineResult<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::invalid(field, format!("'{}' is not a valid timestamp", value)))
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Shift a month start by `delta` months (negative goes back in time)
pub fn add_months(month_start: NaiveDate, delta: i32) -> EngineResult<NaiveDate> {
    let index = month_start.year() * 12 + month_start.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .ok_or_else(|| EngineError::invalid("date", format!("{} months from {} is out of range", delta, month_start)))
}

pub fn parse_optional_date(field: &str, value: Option<&str>) -> EngineResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
        assert_eq!(parse_date("date", "2025-06-13").unwrap(), expected);
        assert_eq!(parse_date("date", "2025-06-13T09:00:00-04:00").unwrap(), expected);
        assert!(parse_date("date", "13/06/2025").is_err());
    }

    #[test]
    fn test_parse_timestamp_normalises_to_utc() {
        let ts = parse_timestamp("createdAt", "2025-06-13T22:30:00-04:00").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());

        let midnight = parse_timestamp("createdAt", "2025-06-13").unwrap();
        assert_eq!(midnight.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 13).unwrap());
    }

    #[test]
    fn test_month_arithmetic() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

        assert_eq!(first_of_month(d(2026, 10, 19)), d(2026, 10, 1));
        assert_eq!(add_months(d(2026, 10, 1), -11).unwrap(), d(2025, 11, 1));
        assert_eq!(add_months(d(2026, 1, 1), -1).unwrap(), d(2025, 12, 1));
        assert_eq!(add_months(d(2026, 11, 1), 3).unwrap(), d(2027, 2, 1));
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("dueDate", None).unwrap(), None);
        assert_eq!(parse_optional_date("dueDate", Some("  ")).unwrap(), None);
        assert!(parse_optional_date("dueDate", Some("soon")).is_err());
    }
}
