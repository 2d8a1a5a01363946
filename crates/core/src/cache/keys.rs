use chrono::NaiveDate;

use crate::article::{format_day, Category};

/// Prefix shared by every article record key.
pub const ARTICLE_KEY_PREFIX: &str = "article:id:";

/// Returns the cache key of an article's field-map.
pub fn article_key(id: i64) -> String {
    format!("{ARTICLE_KEY_PREFIX}{id}")
}

/// Returns the key of the set holding every article published on `day`.
pub fn date_index_key(day: NaiveDate) -> String {
    format!("article:date:{}", format_day(day))
}

/// Returns the key of the set holding every article in `category`.
pub fn category_index_key(category: Category) -> String {
    format!("article:category:{}", category)
}
