//! Hand-written tier mocks shared by the service, handler and router tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use headlines_core::article::{Article, ArticleSummary, Category, RawArticle, CATEGORY_LISTING_LIMIT};
use headlines_core::cache::{self, article_key, ArticleCache, CacheError};
use headlines_core::source::{self, ArticleSource, FetchError};
use headlines_core::storage::{self, prepare_batch, ArticleRepository, RawBatch, RepositoryError};

/// The day every fixture is published on.
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn published_at() -> NaiveDateTime {
    test_day().and_hms_opt(9, 0, 0).unwrap()
}

/// A persisted article published on [`test_day`].
pub fn stored_article(id: i64, category: Category) -> Article {
    Article {
        id,
        category,
        title: format!("{category} article {id}"),
        description: Some("Summary".to_string()),
        views: 0,
        published_at: published_at(),
        content: "Body".to_string(),
    }
}

/// `n` valid upstream items published on [`test_day`].
pub fn raw_articles(prefix: &str, n: usize) -> Vec<RawArticle> {
    (0..n)
        .map(|i| {
            RawArticle::new(format!("{prefix} story {i}"), "2024-06-15T10:00:00Z")
                .with_content("Body")
        })
        .collect()
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Default)]
pub struct MockCache {
    records: RwLock<BTreeMap<i64, Article>>,
    corrupt: RwLock<BTreeSet<i64>>,
    failure: RwLock<Option<CacheError>>,
    discard_inserts: AtomicBool,
    insert_calls: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, articles: &[Article]) {
        let mut records = self.records.write().await;
        for article in articles {
            records.insert(article.id, article.clone());
        }
    }

    /// Makes the record of `id` fail validation when read.
    pub async fn corrupt(&self, id: i64) {
        self.corrupt.write().await.insert(id);
    }

    /// Makes every call fail with `error`.
    pub async fn fail_with(&self, error: CacheError) {
        *self.failure.write().await = Some(error);
    }

    /// Accepts inserts without storing anything.
    pub fn discard_inserts(&self, discard: bool) {
        self.discard_inserts.store(discard, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.records.read().await.contains_key(&id)
    }

    pub async fn views(&self, id: i64) -> Option<u64> {
        self.records.read().await.get(&id).map(|a| a.views)
    }

    async fn check(&self) -> cache::Result<()> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn listing(
        &self,
        day: NaiveDate,
        category: Option<Category>,
    ) -> cache::Result<Vec<ArticleSummary>> {
        self.check().await?;
        let records = self.records.read().await;
        let corrupt = self.corrupt.read().await;

        records
            .values()
            .filter(|a| a.published_at.date() == day)
            .filter(|a| category.is_none_or(|c| a.category == c))
            .map(|a| {
                if corrupt.contains(&a.id) {
                    Err(CacheError::Validation(format!("invalid views in {}", article_key(a.id))))
                } else {
                    Ok(ArticleSummary::from(a))
                }
            })
            .collect()
    }
}

#[async_trait]
impl ArticleCache for MockCache {
    async fn get_by_id(&self, id: i64) -> cache::Result<Article> {
        self.check().await?;
        if self.corrupt.read().await.contains(&id) {
            return Err(CacheError::Validation(format!("invalid record {id}")));
        }
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(article_key(id)))
    }

    async fn get_all_by_date(&self, day: NaiveDate) -> cache::Result<Vec<ArticleSummary>> {
        self.listing(day, None).await
    }

    async fn get_by_date_category(
        &self,
        day: NaiveDate,
        category: Category,
    ) -> cache::Result<Vec<ArticleSummary>> {
        self.listing(day, Some(category)).await
    }

    async fn insert(&self, articles: &[Article]) -> cache::Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        if !self.discard_inserts.load(Ordering::SeqCst) {
            self.seed(articles).await;
        }
        Ok(())
    }

    async fn increment_view(&self, id: i64, delta: u64) -> cache::Result<()> {
        self.check().await?;
        let mut records = self.records.write().await;
        let article = records
            .get_mut(&id)
            .ok_or_else(|| CacheError::NotFound(article_key(id)))?;
        article.views += delta;
        Ok(())
    }

    async fn ping(&self) -> cache::Result<()> {
        self.check().await
    }
}

// ============================================================================
// Store
// ============================================================================

pub struct MockRepository {
    articles: RwLock<BTreeMap<i64, Article>>,
    next_id: AtomicI64,
    failure: RwLock<Option<RepositoryError>>,
    increments: Arc<RwLock<()>>,
    insert_calls: AtomicUsize,
    select_calls: AtomicUsize,
    get_calls: AtomicUsize,
    increment_calls: AtomicUsize,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self {
            articles: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            failure: RwLock::new(None),
            increments: Arc::new(RwLock::new(())),
            insert_calls: AtomicUsize::new(0),
            select_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            increment_calls: AtomicUsize::new(0),
        }
    }
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, articles: &[Article]) {
        let mut stored = self.articles.write().await;
        for article in articles {
            stored.insert(article.id, article.clone());
            self.next_id.fetch_max(article.id + 1, Ordering::SeqCst);
        }
    }

    /// Makes every call fail with `error`.
    pub async fn fail_with(&self, error: RepositoryError) {
        *self.failure.write().await = Some(error);
    }

    /// Blocks `increment_view` until the returned guard is dropped.
    pub async fn hold_increments(&self) -> OwnedRwLockWriteGuard<()> {
        self.increments.clone().write_owned().await
    }

    /// Waits until `increment_view` has been entered `n` times.
    pub async fn wait_for_increment_calls(&self, n: usize) {
        while self.increment_calls.load(Ordering::SeqCst) < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub async fn views(&self, id: i64) -> Option<u64> {
        self.articles.read().await.get(&id).map(|a| a.views)
    }

    async fn check(&self) -> storage::Result<()> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ArticleRepository for MockRepository {
    async fn insert(&self, batch: &RawBatch) -> storage::Result<Vec<Article>> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;

        let (accepted, _) = prepare_batch(batch);
        let stored: Vec<Article> = accepted
            .into_iter()
            .map(|article| article.into_article(self.next_id.fetch_add(1, Ordering::SeqCst)))
            .collect();
        self.seed(&stored).await;
        Ok(stored)
    }

    async fn select_all(&self, day: NaiveDate) -> storage::Result<Vec<Article>> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self
            .articles
            .read()
            .await
            .values()
            .filter(|a| a.published_at.date() == day)
            .cloned()
            .collect())
    }

    async fn select_by_category(
        &self,
        category: Category,
        day: NaiveDate,
    ) -> storage::Result<Vec<Article>> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        Ok(self
            .articles
            .read()
            .await
            .values()
            .filter(|a| a.published_at.date() == day && a.category == category)
            .take(CATEGORY_LISTING_LIMIT)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> storage::Result<Article> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        self.articles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::article_not_found(id))
    }

    async fn increment_view(&self, id: i64) -> storage::Result<()> {
        self.increment_calls.fetch_add(1, Ordering::SeqCst);
        let _gate = self.increments.read().await;
        self.check().await?;
        let mut articles = self.articles.write().await;
        let article = articles
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::article_not_found(id))?;
        article.views += 1;
        Ok(())
    }

    async fn ping(&self) -> storage::Result<()> {
        self.check().await
    }
}

// ============================================================================
// Upstream
// ============================================================================

#[derive(Default)]
pub struct MockSource {
    responses: RwLock<HashMap<Category, source::Result<Vec<RawArticle>>>>,
    delay: RwLock<Duration>,
    fetched: RwLock<Vec<Category>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for `category`. Unset categories answer with no articles.
    pub async fn respond(&self, category: Category, result: Result<Vec<RawArticle>, FetchError>) {
        self.responses.write().await.insert(category, result);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Categories fetched so far, in call order.
    pub async fn fetched(&self) -> Vec<Category> {
        self.fetched.read().await.clone()
    }
}

#[async_trait]
impl ArticleSource for MockSource {
    async fn fetch(&self, category: Category, _day: NaiveDate) -> source::Result<Vec<RawArticle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.write().await.push(category);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
