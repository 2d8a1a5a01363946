use async_trait::async_trait;
use chrono::NaiveDate;

use crate::article::{Article, Category};

use super::{RawBatch, Result};

/// The durable tier.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Persists every valid item of the batch in one transaction and returns
    /// the stored articles with their assigned ids.
    ///
    /// Items that fail to parse are skipped; they never abort the batch.
    async fn insert(&self, batch: &RawBatch) -> Result<Vec<Article>>;

    /// Returns every article published on `day`.
    async fn select_all(&self, day: NaiveDate) -> Result<Vec<Article>>;

    /// Returns at most [`CATEGORY_LISTING_LIMIT`](crate::article::CATEGORY_LISTING_LIMIT)
    /// articles of `category` published on `day`.
    async fn select_by_category(&self, category: Category, day: NaiveDate)
        -> Result<Vec<Article>>;

    /// Gets an article by id, failing with `NotFound` when absent.
    async fn get_by_id(&self, id: i64) -> Result<Article>;

    /// Atomically adds one to an article's view counter.
    async fn increment_view(&self, id: i64) -> Result<()>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;
}
