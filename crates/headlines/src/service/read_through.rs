//! Cache-aside read path.
//!
//! Every listing walks the same chain:
//!
//! ```text
//! cache ──hit──▶ served
//!   │ miss
//!   ▼
//! store ──rows──▶ backfill cache ──▶ re-read cache ──▶ served
//!   │ empty
//!   ▼
//! upstream fan-out ──▶ persist ──▶ backfill cache ──▶ re-read cache ──▶ served
//! ```
//!
//! A cache that cannot be reached is skipped: the listing is projected from
//! the store rows instead. A re-read that misses right after a backfill is an
//! unexpected failure, never a further fallback.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures_util::future::join_all;

use headlines_core::article::{Article, ArticleSummary, Category};
use headlines_core::cache::{ArticleCache, CacheError};
use headlines_core::source::ArticleSource;
use headlines_core::storage::{batch_len, ArticleRepository, RawBatch, RepositoryError};
use headlines_core::ErrorKind;

use super::deadline::bounded;
use super::flight::InFlight;
use super::views::ViewCounter;
use super::ServiceError;

type Result<T> = std::result::Result<T, ServiceError>;

/// Which listing a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    All,
    Category(Category),
}

impl Scope {
    fn categories(self) -> Vec<Category> {
        match self {
            Scope::All => Category::ALL.to_vec(),
            Scope::Category(category) => vec![category],
        }
    }
}

/// Outcome of a cache listing lookup.
enum Lookup {
    Hit(Vec<ArticleSummary>),
    Miss,
    /// The cache is unreachable; skip backfill and re-read.
    Unreachable,
}

/// The read-through orchestrator shared by all handlers.
pub struct ReadThrough {
    cache: Arc<dyn ArticleCache>,
    store: Arc<dyn ArticleRepository>,
    source: Arc<dyn ArticleSource>,
    views: ViewCounter,
    flights: InFlight<(Category, NaiveDate)>,
    budget: Duration,
}

impl ReadThrough {
    /// Creates the orchestrator.
    ///
    /// # Arguments
    ///
    /// * `budget` - Time budget of every cache and store call
    pub fn new(
        cache: Arc<dyn ArticleCache>,
        store: Arc<dyn ArticleRepository>,
        source: Arc<dyn ArticleSource>,
        views: ViewCounter,
        budget: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            source,
            views,
            flights: InFlight::default(),
            budget,
        }
    }

    /// Lists every article published on `day`.
    pub async fn list_all(&self, day: NaiveDate) -> Result<Vec<ArticleSummary>> {
        self.listing(Scope::All, day).await
    }

    /// Lists the articles of one category published on `day`.
    pub async fn list_by_category(
        &self,
        category: Category,
        day: NaiveDate,
    ) -> Result<Vec<ArticleSummary>> {
        self.listing(Scope::Category(category), day).await
    }

    /// Returns one article and counts the view.
    ///
    /// The view is only enqueued; the read does not wait for it.
    pub async fn detail(&self, id: i64) -> Result<Article> {
        self.views.record(id);

        match bounded(self.budget, "cache.get_by_id", self.cache.get_by_id(id)).await {
            Ok(article) => {
                tracing::debug!(article_id = id, tier = "cache", "Served article");
                return Ok(article);
            }
            Err(CacheError::NotFound(_)) => {
                tracing::debug!(article_id = id, "Article not cached");
            }
            Err(e) => {
                tracing::warn!(article_id = id, error = %e, "Cache read failed, falling back to store");
            }
        }

        let article = bounded(self.budget, "store.get_by_id", self.store.get_by_id(id))
            .await
            .map_err(|e| {
                log_store_failure(&e);
                ServiceError::from_store(&e, Some(id))
            })?;

        // No backfill: a lone cached article would shadow its day's listing.
        tracing::debug!(article_id = id, tier = "store", "Served article");
        Ok(article)
    }

    async fn listing(&self, scope: Scope, day: NaiveDate) -> Result<Vec<ArticleSummary>> {
        let cache_reachable = match self.lookup(scope, day).await? {
            Lookup::Hit(summaries) => {
                tracing::debug!(?scope, %day, count = summaries.len(), tier = "cache", "Served listing");
                return Ok(summaries);
            }
            Lookup::Miss => true,
            Lookup::Unreachable => false,
        };

        let rows = self.stored(scope, day).await?;
        if !rows.is_empty() {
            tracing::debug!(?scope, %day, count = rows.len(), tier = "store", "Backfilling listing");
            return self.backfill(scope, day, rows, cache_reachable).await;
        }

        self.cold_build(scope, day, cache_reachable).await
    }

    /// Builds a listing from upstream while holding the in-flight guard of
    /// every category in scope.
    async fn cold_build(
        &self,
        scope: Scope,
        day: NaiveDate,
        cache_reachable: bool,
    ) -> Result<Vec<ArticleSummary>> {
        let categories = scope.categories();
        let keys: Vec<(Category, NaiveDate)> =
            categories.iter().map(|&category| (category, day)).collect();
        let _guards = self.flights.acquire_all(keys).await;

        // A concurrent build may have persisted while we waited.
        let rows = self.stored(scope, day).await?;
        if !rows.is_empty() {
            tracing::debug!(?scope, %day, "Listing built by a concurrent request");
            return self.backfill(scope, day, rows, cache_reachable).await;
        }

        let batch = self.fetch(&categories, day).await;
        if batch_len(&batch) == 0 {
            tracing::info!(?scope, %day, "Upstream returned no articles");
            return Ok(Vec::new());
        }

        let persisted = bounded(self.budget, "store.insert", self.store.insert(&batch))
            .await
            .map_err(|e| {
                log_store_failure(&e);
                ServiceError::from_store(&e, None)
            })?;
        if persisted.is_empty() {
            tracing::info!(?scope, %day, "No upstream article could be persisted");
            return Ok(Vec::new());
        }

        tracing::info!(?scope, %day, count = persisted.len(), tier = "upstream", "Persisted upstream articles");
        self.backfill(scope, day, persisted, cache_reachable).await
    }

    /// Fetches every category concurrently. A failed category is empty.
    async fn fetch(&self, categories: &[Category], day: NaiveDate) -> RawBatch {
        let fetches = categories.iter().map(|&category| async move {
            (category, self.source.fetch(category, day).await)
        });

        let mut batch = RawBatch::new();
        for (category, result) in join_all(fetches).await {
            let articles = result.unwrap_or_else(|e| {
                tracing::warn!(
                    %category,
                    kind = ?e.kind(),
                    status = %e.status,
                    error = %e,
                    description = e.description.as_deref().unwrap_or_default(),
                    "Upstream fetch failed, treating category as empty"
                );
                Vec::new()
            });
            batch.insert(category, articles);
        }
        batch
    }

    async fn lookup(&self, scope: Scope, day: NaiveDate) -> Result<Lookup> {
        match self.cached(scope, day).await {
            Ok(summaries) if summaries.is_empty() => Ok(Lookup::Miss),
            Ok(summaries) => Ok(Lookup::Hit(summaries)),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => Ok(Lookup::Miss),
                kind if kind.triggers_fallback() => {
                    tracing::warn!(?scope, %day, error = %e, "Cache unreachable, reading from store");
                    Ok(Lookup::Unreachable)
                }
                _ => {
                    tracing::error!(?scope, %day, error = %e, "Cached listing failed validation");
                    Err(ServiceError::from_cache(&e))
                }
            },
        }
    }

    /// Writes `rows` to the cache and serves the listing from the cache.
    async fn backfill(
        &self,
        scope: Scope,
        day: NaiveDate,
        rows: Vec<Article>,
        cache_reachable: bool,
    ) -> Result<Vec<ArticleSummary>> {
        if !cache_reachable {
            return Ok(project_sorted(&rows));
        }

        if let Err(e) = bounded(self.budget, "cache.insert", self.cache.insert(&rows)).await {
            if e.kind() == ErrorKind::TransientConnectivity {
                tracing::warn!(?scope, %day, error = %e, "Cache backfill failed, serving from store");
                return Ok(project_sorted(&rows));
            }
            tracing::warn!(?scope, %day, error = %e, "Cache backfill partially failed");
        }

        match self.lookup(scope, day).await? {
            Lookup::Hit(summaries) => {
                tracing::debug!(?scope, %day, count = summaries.len(), tier = "cache", "Served listing after backfill");
                Ok(summaries)
            }
            Lookup::Unreachable => Ok(project_sorted(&rows)),
            Lookup::Miss => {
                tracing::error!(?scope, %day, count = rows.len(), "Cache missed right after backfill");
                Err(ServiceError::Unexpected(format!(
                    "cache re-read for {day} returned nothing after backfilling {} articles",
                    rows.len()
                )))
            }
        }
    }

    async fn cached(
        &self,
        scope: Scope,
        day: NaiveDate,
    ) -> std::result::Result<Vec<ArticleSummary>, CacheError> {
        match scope {
            Scope::All => {
                bounded(
                    self.budget,
                    "cache.get_all_by_date",
                    self.cache.get_all_by_date(day),
                )
                .await
            }
            Scope::Category(category) => {
                bounded(
                    self.budget,
                    "cache.get_by_date_category",
                    self.cache.get_by_date_category(day, category),
                )
                .await
            }
        }
    }

    async fn stored(&self, scope: Scope, day: NaiveDate) -> Result<Vec<Article>> {
        let result = match scope {
            Scope::All => bounded(self.budget, "store.select_all", self.store.select_all(day)).await,
            Scope::Category(category) => {
                bounded(
                    self.budget,
                    "store.select_by_category",
                    self.store.select_by_category(category, day),
                )
                .await
            }
        };

        result.map_err(|e| {
            log_store_failure(&e);
            ServiceError::from_store(&e, None)
        })
    }
}

fn project_sorted(rows: &[Article]) -> Vec<ArticleSummary> {
    let mut summaries: Vec<ArticleSummary> = rows.iter().map(ArticleSummary::from).collect();
    summaries.sort_by_key(|s| s.id);
    summaries
}

fn log_store_failure(err: &RepositoryError) {
    match err.kind() {
        ErrorKind::NotFound => tracing::debug!(error = %err, "Article not in store"),
        kind if kind.triggers_fallback() => tracing::error!(error = %err, "Store unreachable"),
        _ => tracing::error!(error = %err, "Store query failed"),
    }
}
