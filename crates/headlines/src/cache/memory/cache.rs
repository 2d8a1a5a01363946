//! In-memory cache implementation with LRU eviction.
//!
//! Records are kept as string field-maps and decoded with the same codec the
//! Redis backend uses, so listings are validated identically:
//! - Every record is indexed in a date set and a category set
//! - Evicting a record removes its key from every index set
//! - `increment_view` never creates a record that is not cached

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use lru::LruCache;
use tokio::sync::RwLock;

use headlines_core::article::{Article, ArticleSummary, Category};
use headlines_core::cache::{
    article_from_fields, article_key, article_to_fields, category_index_key, date_index_key,
    summary_from_values, ArticleCache, CacheError, Result, FIELD_VIEWS, LISTING_FIELDS,
};

type Record = HashMap<String, String>;

#[derive(Debug)]
struct Store {
    /// Article field-maps keyed by `article:id:{id}`.
    records: LruCache<String, Record>,
    /// Index sets keyed by `article:date:{day}` / `article:category:{name}`.
    sets: HashMap<String, BTreeSet<String>>,
}

impl Store {
    fn put(&mut self, key: String, record: Record) {
        if let Some((evicted, _)) = self.records.push(key.clone(), record) {
            if evicted != key {
                self.unindex(&evicted);
            }
        }
    }

    fn unindex(&mut self, key: &str) {
        self.sets.retain(|_, members| {
            members.remove(key);
            !members.is_empty()
        });
    }

    fn index(&mut self, set_key: String, member: &str) {
        self.sets
            .entry(set_key)
            .or_default()
            .insert(member.to_string());
    }

    fn listing<'a>(
        &mut self,
        members: impl Iterator<Item = &'a String>,
    ) -> Result<Vec<ArticleSummary>> {
        let keys: Vec<String> = members.cloned().collect();
        let mut summaries = Vec::with_capacity(keys.len());
        for key in keys {
            let values: Vec<Option<String>> = match self.records.get(&key) {
                Some(record) => LISTING_FIELDS
                    .iter()
                    .map(|field| record.get(*field).cloned())
                    .collect(),
                None => vec![None; LISTING_FIELDS.len()],
            };
            let summary = summary_from_values(&values).map_err(|e| {
                tracing::warn!(key = %key, error = %e, "Cached record failed validation");
                e
            })?;
            summaries.push(summary);
        }
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }
}

/// In-memory article cache with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<..>>` for concurrent access. Records
/// and index sets live behind the same lock so eviction and index cleanup
/// happen together.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<Store>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Arguments
    ///
    /// * `max_entries` - Maximum number of article records before LRU eviction kicks in.
    ///   Zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(Store {
                records: LruCache::new(capacity),
                sets: HashMap::new(),
            })),
        }
    }

    /// Writes a raw field-map and indexes it, bypassing the codec.
    #[cfg(test)]
    pub async fn insert_raw(&self, key: &str, fields: &[(&str, &str)], sets: &[String]) {
        let record = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut store = self.store.write().await;
        store.put(key.to_string(), record);
        for set_key in sets {
            store.index(set_key.clone(), key);
        }
    }
}

#[async_trait]
impl ArticleCache for MemoryCache {
    async fn get_by_id(&self, id: i64) -> Result<Article> {
        let key = article_key(id);
        let mut store = self.store.write().await;

        match store.records.get(&key) {
            Some(record) => article_from_fields(record),
            None => Err(CacheError::NotFound(key)),
        }
    }

    async fn get_all_by_date(&self, day: NaiveDate) -> Result<Vec<ArticleSummary>> {
        let mut store = self.store.write().await;
        let members = store
            .sets
            .get(&date_index_key(day))
            .cloned()
            .unwrap_or_default();

        store.listing(members.iter())
    }

    async fn get_by_date_category(
        &self,
        day: NaiveDate,
        category: Category,
    ) -> Result<Vec<ArticleSummary>> {
        let mut store = self.store.write().await;
        let members: BTreeSet<String> = match (
            store.sets.get(&date_index_key(day)),
            store.sets.get(&category_index_key(category)),
        ) {
            (Some(by_date), Some(by_category)) => {
                by_date.intersection(by_category).cloned().collect()
            }
            _ => BTreeSet::new(),
        };

        store.listing(members.iter())
    }

    async fn insert(&self, articles: &[Article]) -> Result<()> {
        let mut store = self.store.write().await;

        for article in articles {
            let key = article_key(article.id);
            let record = article_to_fields(article)
                .into_iter()
                .map(|(field, value)| (field.to_string(), value))
                .collect();

            store.put(key.clone(), record);
            store.index(date_index_key(article.published_at.date()), &key);
            store.index(category_index_key(article.category), &key);
        }

        tracing::trace!(count = articles.len(), "Cached articles");
        Ok(())
    }

    async fn increment_view(&self, id: i64, delta: u64) -> Result<()> {
        let key = article_key(id);
        let mut store = self.store.write().await;

        let record = store
            .records
            .get_mut(&key)
            .ok_or_else(|| CacheError::NotFound(key.clone()))?;
        let views: u64 = record
            .get(FIELD_VIEWS)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| CacheError::OperationFailed(format!("{key} has no integer views")))?;
        record.insert(
            FIELD_VIEWS.to_string(),
            views.saturating_add(delta).to_string(),
        );

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
