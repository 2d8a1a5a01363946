//! SQLite repository implementation.
//!
//! Implements `ArticleRepository` from `headlines_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_rusqlite::Connection;

use headlines_core::article::{Article, Category, CATEGORY_LISTING_LIMIT};
use headlines_core::storage::{
    prepare_batch, ArticleRepository, RawBatch, RepositoryError, Result,
};

use super::conversions::{day_bounds, format_timestamp, row_to_article};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based article repository.
///
/// `tokio_rusqlite::Connection` serialises every call on one background
/// thread, so a single handle is shared by all requests.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        tracing::debug!(path, "Opened SQLite article store");
        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, "Schema"))
    }

    async fn select(
        &self,
        sql: &'static str,
        params: Vec<rusqlite::types::Value>,
    ) -> Result<Vec<Article>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params), row_to_article)
                    .map_err(wrap_err)?;

                let mut articles = Vec::new();
                for row_result in rows {
                    articles.push(row_result.map_err(wrap_err)?);
                }
                Ok(articles)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Article"))
    }
}

#[async_trait]
impl ArticleRepository for SqliteRepository {
    async fn insert(&self, batch: &RawBatch) -> Result<Vec<Article>> {
        let (articles, rejected) = prepare_batch(batch);

        for item in &rejected {
            tracing::warn!(
                category = %item.category,
                index = item.index,
                error = %item.error,
                "Skipping upstream article"
            );
        }

        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut stored = Vec::with_capacity(articles.len());
                {
                    let mut stmt = tx.prepare(schema::INSERT_ARTICLE).map_err(wrap_err)?;
                    for article in articles {
                        let result = stmt.execute(rusqlite::params![
                            article.category.as_str(),
                            article.title,
                            article.description,
                            format_timestamp(&article.published_at),
                            article.content,
                        ]);
                        match result {
                            Ok(_) => {
                                let id = tx.last_insert_rowid();
                                stored.push(article.into_article(id));
                            }
                            Err(e) => {
                                tracing::warn!(
                                    category = %article.category,
                                    title = %article.title,
                                    error = %e,
                                    "Failed to insert article"
                                );
                            }
                        }
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(stored)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Article"))?;

        tracing::debug!(
            inserted = stored.len(),
            skipped = rejected.len(),
            "Persisted upstream batch"
        );
        Ok(stored)
    }

    async fn select_all(&self, day: NaiveDate) -> Result<Vec<Article>> {
        let (start, end) = day_bounds(day);
        self.select(
            schema::SELECT_ARTICLES_BY_DAY,
            vec![start.into(), end.into()],
        )
        .await
    }

    async fn select_by_category(
        &self,
        category: Category,
        day: NaiveDate,
    ) -> Result<Vec<Article>> {
        let (start, end) = day_bounds(day);
        self.select(
            schema::SELECT_ARTICLES_BY_CATEGORY_AND_DAY,
            vec![
                category.as_str().to_string().into(),
                start.into(),
                end.into(),
                (CATEGORY_LISTING_LIMIT as i64).into(),
            ],
        )
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Article> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ARTICLE_BY_ID)
                    .map_err(wrap_err)?;
                let article = stmt.query_row([id], row_to_article).map_err(wrap_err)?;
                Ok(article)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Article", id.to_string()))
    }

    async fn increment_view(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::INCREMENT_VIEWS, [id])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Article", id.to_string()))
    }

    async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::PING, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Article"))
    }
}
