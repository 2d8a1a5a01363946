use thiserror::Error;

/// Errors that can occur when validating or ingesting articles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArticleError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid publishedAt value: {0}")]
    InvalidPublishedAt(String),
}
