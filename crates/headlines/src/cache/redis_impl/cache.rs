//! Redis cache implementation.
//!
//! Layout: one hash per article (`article:id:{id}`) plus two sets of record
//! keys per article (`article:date:{day}` and `article:category:{name}`).
//!
//! Each article is written with `HSET` + `SADD` + `SADD` in one `MULTI/EXEC`
//! pipeline, so a set never references a hash written by a failed
//! transaction. Listings resolve the set (or the intersection of two sets)
//! and then fetch the listing fields of every member in one pipelined round
//! trip of `HMGET`s.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use redis::AsyncCommands;

use headlines_core::article::{Article, ArticleSummary, Category};
use headlines_core::cache::{
    article_from_fields, article_key, article_to_fields, category_index_key, date_index_key,
    summary_from_values, ArticleCache, CacheError, Result, FIELD_VIEWS, LISTING_FIELDS,
};

use super::error::map_redis_error;

/// Adds to a hash field only when the hash already exists.
const INCREMENT_IF_EXISTS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return redis.call('HINCRBY', KEYS[1], ARGV[1], ARGV[2])
end
return false
"#;

/// Redis cache backend using connection manager for reconnection.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    increment: redis::Script,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            increment: redis::Script::new(INCREMENT_IF_EXISTS),
        })
    }

    /// Fetches the listing fields of every member key and decodes them.
    async fn listing(&self, members: Vec<String>) -> Result<Vec<ArticleSummary>> {
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for key in &members {
            pipe.cmd("HMGET").arg(key).arg(&LISTING_FIELDS[..]);
        }

        let mut conn = self.conn.clone();
        let rows: Vec<Vec<Option<String>>> =
            pipe.query_async(&mut conn).await.map_err(map_redis_error)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (key, values) in members.iter().zip(rows) {
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

#[async_trait]
impl ArticleCache for RedisCache {
    async fn get_by_id(&self, id: i64) -> Result<Article> {
        let key = article_key(id);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> =
            conn.hgetall(&key).await.map_err(map_redis_error)?;
        if fields.is_empty() {
            return Err(CacheError::NotFound(key));
        }

        article_from_fields(&fields)
    }

    async fn get_all_by_date(&self, day: NaiveDate) -> Result<Vec<ArticleSummary>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .smembers(date_index_key(day))
            .await
            .map_err(map_redis_error)?;

        self.listing(members).await
    }

    async fn get_by_date_category(
        &self,
        day: NaiveDate,
        category: Category,
    ) -> Result<Vec<ArticleSummary>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .sinter(&[date_index_key(day), category_index_key(category)])
            .await
            .map_err(map_redis_error)?;

        self.listing(members).await
    }

    async fn insert(&self, articles: &[Article]) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut failures = 0usize;

        for article in articles {
            let key = article_key(article.id);
            let fields = article_to_fields(article);

            let mut pipe = redis::pipe();
            pipe.atomic()
                .hset_multiple(&key, fields.as_slice())
                .ignore()
                .sadd(date_index_key(article.published_at.date()), &key)
                .ignore()
                .sadd(category_index_key(article.category), &key)
                .ignore();

            let result: redis::RedisResult<()> = pipe.query_async(&mut conn).await;
            if let Err(err) = result {
                let err = map_redis_error(err);
                if matches!(err, CacheError::ConnectionFailed(_)) {
                    return Err(err);
                }
                tracing::warn!(article_id = article.id, error = %err, "Failed to cache article");
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(CacheError::OperationFailed(format!(
                "{failures} of {} articles failed to cache",
                articles.len()
            )));
        }

        tracing::trace!(count = articles.len(), "Cached articles");
        Ok(())
    }

    async fn increment_view(&self, id: i64, delta: u64) -> Result<()> {
        let key = article_key(id);
        let mut conn = self.conn.clone();

        let views: Option<i64> = self
            .increment
            .key(&key)
            .arg(FIELD_VIEWS)
            .arg(delta)
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        match views {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key)),
        }
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}
