//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{Days, NaiveDate, NaiveDateTime};
use rusqlite::Row;

use headlines_core::article::{format_day, Article, Category};

/// Storage format of `published_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a SQLite row to an Article.
///
/// Expected columns: id, category, title, description, views, published_at, content
pub fn row_to_article(row: &Row) -> rusqlite::Result<Article> {
    let id: i64 = row.get(0)?;
    let category: Option<String> = row.get(1)?;
    let title: String = row.get(2)?;
    let description: Option<String> = row.get(3)?;
    let views: i64 = row.get(4)?;
    let published_at: String = row.get(5)?;
    let content: String = row.get(6)?;

    Ok(Article {
        id,
        category: parse_category(1, category)?,
        title,
        description,
        views: u64::try_from(views).map_err(|e| conversion_error(4, e))?,
        published_at: parse_timestamp(5, &published_at)?,
        content,
    })
}

/// Format a timestamp for SQLite storage.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Returns the `[day, next day)` bounds used by the date filters.
pub fn day_bounds(day: NaiveDate) -> (String, String) {
    let next = day.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    (format_day(day), format_day(next))
}

fn parse_category(idx: usize, value: Option<String>) -> rusqlite::Result<Category> {
    let value = value.ok_or_else(|| {
        conversion_error(
            idx,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "category is NULL"),
        )
    })?;
    value.parse().map_err(|e| conversion_error(idx, e))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}
