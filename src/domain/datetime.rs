use chrono::{NaiveDate, NaiveTime};

use super::store::StoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validate a `YYYY-MM-DD` date and `HH:MM` time pair and combine them into
/// the canonical `YYYY-MM-DD HH:MM` notify timestamp.
///
/// The canonical format sorts lexicographically in chronological order, which
/// is what makes plain string comparison in the due-reminder query correct.
/// chrono accepts non-zero-padded fields (`9:00`, `2025-1-1`) that would sort
/// wrongly as strings, so the input must round-trip through the format
/// unchanged.
pub fn combine_notify_at(date: &str, time: &str) -> Result<String, StoreError> {
    let parsed_date = NaiveDate::parse_from_str(date, DATE_FORMAT);
    let parsed_time = NaiveTime::parse_from_str(time, TIME_FORMAT);
    match (parsed_date, parsed_time) {
        (Ok(d), Ok(t))
            if d.format(DATE_FORMAT).to_string() == date
                && t.format(TIME_FORMAT).to_string() == time =>
        {
            Ok(format!("{date} {time}"))
        }
        _ => Err(StoreError::InvalidDateTimeFormat {
            date: date.to_string(),
            time: time.to_string(),
        }),
    }
}

/// Format a timestamp at minute resolution for comparison against
/// `notify_date_time` values.
pub fn format_minute(ts: chrono::NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}
