//! Date windowing.
//!
//! The upstream content API lags by one day, so "yesterday" in UTC is the
//! only day every tier is queried for.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::ArticleError;

/// Format of a listing day and of the cache date-index keys.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format of `publishedAt` in upstream responses.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Returns the date `n` days before `today`.
///
/// Saturates at the minimum representable date instead of panicking.
pub fn days_before(today: NaiveDate, n: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Returns the UTC calendar date `n` days ago, formatted as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use headlines_core::article::today_minus;
///
/// let day = today_minus(1);
/// assert_eq!(day.len(), 10);
/// assert_eq!(&day[4..5], "-");
/// ```
pub fn today_minus(n: u32) -> String {
    format_day(days_before(Utc::now().date_naive(), n))
}

/// Returns the fetch day: yesterday in UTC.
pub fn fetch_day() -> NaiveDate {
    days_before(Utc::now().date_naive(), 1)
}

/// Formats a day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses an upstream `publishedAt` timestamp (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn parse_published_at(value: &str) -> Result<NaiveDateTime, ArticleError> {
    NaiveDateTime::parse_from_str(value.trim(), PUBLISHED_AT_FORMAT)
        .map_err(|_| ArticleError::InvalidPublishedAt(value.to_string()))
}

/// Timestamp used when an article is created without one: midnight of the
/// fetch day.
pub fn default_published_at() -> NaiveDateTime {
    fetch_day().and_time(NaiveTime::MIN)
}
