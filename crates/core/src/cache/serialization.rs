//! Pure functions for encoding articles to and from cache field-maps.
//!
//! Every attribute is stored as a string. Listings read only
//! [`LISTING_FIELDS`], in that order, and any value that does not decode
//! fails the record with [`CacheError::Validation`].

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::article::{Article, ArticleSummary, Category};

use super::{CacheError, Result};

pub const FIELD_ID: &str = "id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_VIEWS: &str = "views";
pub const FIELD_PUBLISHED_AT: &str = "published_at";
pub const FIELD_CONTENT: &str = "content";

/// Fields fetched for a listing projection, in decode order.
pub const LISTING_FIELDS: [&str; 4] = [FIELD_ID, FIELD_TITLE, FIELD_CATEGORY, FIELD_VIEWS];

/// Storage format of `published_at` inside a record.
pub const CACHED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Encodes an article as `(field, value)` pairs.
pub fn article_to_fields(article: &Article) -> Vec<(&'static str, String)> {
    vec![
        (FIELD_ID, article.id.to_string()),
        (FIELD_TITLE, article.title.clone()),
        (FIELD_CATEGORY, article.category.to_string()),
        (
            FIELD_DESCRIPTION,
            article.description.clone().unwrap_or_default(),
        ),
        (FIELD_VIEWS, article.views.to_string()),
        (FIELD_PUBLISHED_AT, encode_timestamp(article.published_at)),
        (FIELD_CONTENT, article.content.clone()),
    ]
}

/// Decodes a full article from its field-map.
///
/// An empty map is a miss and yields [`CacheError::NotFound`].
pub fn article_from_fields(fields: &HashMap<String, String>) -> Result<Article> {
    if fields.is_empty() {
        return Err(CacheError::NotFound("empty record".to_string()));
    }

    let field = |name: &'static str| {
        fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CacheError::Validation(format!("missing field `{name}`")))
    };

    let description = fields
        .get(FIELD_DESCRIPTION)
        .filter(|d| !d.is_empty())
        .cloned();

    Ok(Article {
        id: decode_id(field(FIELD_ID)?)?,
        category: decode_category(field(FIELD_CATEGORY)?)?,
        title: decode_title(field(FIELD_TITLE)?)?,
        description,
        views: decode_views(field(FIELD_VIEWS)?)?,
        published_at: decode_timestamp(field(FIELD_PUBLISHED_AT)?)?,
        content: fields.get(FIELD_CONTENT).cloned().unwrap_or_default(),
    })
}

/// Decodes a listing projection from values fetched in [`LISTING_FIELDS`] order.
pub fn summary_from_values(values: &[Option<String>]) -> Result<ArticleSummary> {
    let [id, title, category, views] = values else {
        return Err(CacheError::Validation(format!(
            "expected {} listing fields, got {}",
            LISTING_FIELDS.len(),
            values.len()
        )));
    };

    let required = |value: &Option<String>, name: &str| {
        value
            .as_deref()
            .map(str::to_owned)
            .ok_or_else(|| CacheError::Validation(format!("missing field `{name}`")))
    };

    Ok(ArticleSummary {
        id: decode_id(&required(id, FIELD_ID)?)?,
        title: decode_title(&required(title, FIELD_TITLE)?)?,
        category: decode_category(&required(category, FIELD_CATEGORY)?)?,
        views: decode_views(&required(views, FIELD_VIEWS)?)?,
    })
}

/// Formats a timestamp the way records store it.
pub fn encode_timestamp(value: NaiveDateTime) -> String {
    value.format(CACHED_TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. A bare `YYYY-MM-DD` decodes as midnight.
pub fn decode_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, CACHED_TIMESTAMP_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| CacheError::Validation(format!("invalid published_at `{value}`")))
}

fn decode_id(value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| CacheError::Validation(format!("invalid id `{value}`")))
}

fn decode_views(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| CacheError::Validation(format!("invalid views `{value}`")))
}

fn decode_category(value: &str) -> Result<Category> {
    value
        .parse()
        .map_err(|e: crate::article::ArticleError| CacheError::Validation(e.to_string()))
}

fn decode_title(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(CacheError::Validation("empty title".to_string()));
    }
    Ok(value.to_string())
}
