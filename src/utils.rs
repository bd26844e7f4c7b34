// Utility functions
use chrono::{DateTime, Utc};

/// Converts a millisecond Unix timestamp into `DateTime<Utc>`, if it is in range.
pub fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Short `YYYY-MM-DD` label used on chart axes.
pub fn format_day(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats an optional statistic, printing `n/a` when it is undefined.
pub fn format_opt(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "n/a".to_string(),
    }
}
