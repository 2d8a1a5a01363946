use async_trait::async_trait;
use chrono::NaiveDate;

use crate::article::{Article, ArticleSummary, Category};

use super::Result;

/// The fast tier: per-article records plus date and category index sets.
///
/// Listing reads are strict (one bad record fails the call) while `insert`
/// is lenient and keeps writing past a failed article.
#[async_trait]
pub trait ArticleCache: Send + Sync {
    /// Reads the full record of an article.
    async fn get_by_id(&self, id: i64) -> Result<Article>;

    /// Lists every cached article published on `day`, sorted by id.
    async fn get_all_by_date(&self, day: NaiveDate) -> Result<Vec<ArticleSummary>>;

    /// Lists cached articles published on `day` in `category`, sorted by id.
    async fn get_by_date_category(
        &self,
        day: NaiveDate,
        category: Category,
    ) -> Result<Vec<ArticleSummary>>;

    /// Writes each article's record, then indexes it by date and category.
    async fn insert(&self, articles: &[Article]) -> Result<()>;

    /// Adds `delta` to the cached view counter of an existing record.
    async fn increment_view(&self, id: i64, delta: u64) -> Result<()>;

    /// Checks that the cache is reachable.
    async fn ping(&self) -> Result<()>;
}
