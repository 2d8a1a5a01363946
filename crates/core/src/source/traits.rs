use async_trait::async_trait;
use chrono::NaiveDate;

use crate::article::{Category, RawArticle};

use super::Result;

/// The cold-start tier: a remote content API queried per category.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetches the articles of `category` published on `day`.
    async fn fetch(&self, category: Category, day: NaiveDate) -> Result<Vec<RawArticle>>;
}
