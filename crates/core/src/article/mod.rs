mod dates;
mod error;
mod operations;
mod types;

pub use dates::{
    days_before, default_published_at, fetch_day, format_day, parse_published_at, today_minus,
    DAY_FORMAT, PUBLISHED_AT_FORMAT,
};
pub use error::ArticleError;
pub use operations::{
    project, truncate_at_word, CATEGORY_LISTING_LIMIT, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use types::{Article, ArticleSummary, Category, NewArticle, RawArticle};
