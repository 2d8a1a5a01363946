//! NewsAPI gateway.
//!
//! One `GET` per category against the `everything` endpoint, scoped to a
//! single day and to English titles mentioning the category.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use headlines_core::article::{format_day, Category, RawArticle};
use headlines_core::source::{decode_response, ArticleSource, FetchError, Result};

/// Content source backed by the NewsAPI HTTP API.
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl NewsApiSource {
    /// Creates a new source.
    ///
    /// # Arguments
    ///
    /// * `url` - Search endpoint (e.g., "https://newsapi.org/v2/everything")
    /// * `api_key` - Key sent as the `apiKey` query parameter
    /// * `timeout` - Budget for each request, connect included
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| map_reqwest_error(&e))?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    async fn fetch(&self, category: Category, day: NaiveDate) -> Result<Vec<RawArticle>> {
        let day = format_day(day);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", category.as_str()),
                ("searchIn", "title"),
                ("language", "en"),
                ("from", day.as_str()),
                ("to", day.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| map_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

        let articles = decode_response(status, &body)?;
        tracing::debug!(%category, %day, count = articles.len(), "Fetched upstream articles");
        Ok(articles)
    }
}

/// Maps a transport failure to a `FetchError`.
///
/// The URL is stripped from the description so the API key never reaches
/// the logs.
fn map_reqwest_error(err: &reqwest::Error) -> FetchError {
    let message = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_builder() {
        "invalid request"
    } else {
        "request failed"
    };

    let description = match err.url() {
        Some(_) => format!("{message}: {}", without_url(err)),
        None => err.to_string(),
    };

    FetchError::transport(message, description)
}

fn without_url(err: &reqwest::Error) -> String {
    use std::error::Error as _;

    err.source()
        .map(|source| source.to_string())
        .unwrap_or_else(|| "no further detail".to_string())
}
