mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{article_key, category_index_key, date_index_key, ARTICLE_KEY_PREFIX};
pub use serialization::{
    article_from_fields, article_to_fields, decode_timestamp, encode_timestamp,
    summary_from_values, CACHED_TIMESTAMP_FORMAT, FIELD_CATEGORY, FIELD_CONTENT,
    FIELD_DESCRIPTION, FIELD_ID, FIELD_PUBLISHED_AT, FIELD_TITLE, FIELD_VIEWS, LISTING_FIELDS,
};
pub use traits::ArticleCache;
