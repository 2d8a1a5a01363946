use thiserror::Error;

use crate::ErrorKind;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Shorthand for a missing article.
    pub fn article_not_found(id: i64) -> Self {
        RepositoryError::NotFound {
            entity_type: "Article",
            id: id.to_string(),
        }
    }

    /// Classifies the error for the read-through fallback policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::ConnectionFailed(_) => ErrorKind::TransientConnectivity,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::QueryFailed(_)
            | RepositoryError::Serialization(_)
            | RepositoryError::InvalidData(_) => ErrorKind::DataIntegrity,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::article_not_found(42);
        assert_eq!(error.to_string(), "Article not found: 42");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("database is locked".to_string());
        assert_eq!(error.to_string(), "Connection failed: database is locked");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("no such column: foo".to_string());
        assert_eq!(error.to_string(), "Query failed: no such column: foo");
    }

    #[test]
    fn test_repository_error_kinds() {
        assert_eq!(
            RepositoryError::ConnectionFailed(String::new()).kind(),
            ErrorKind::TransientConnectivity
        );
        assert_eq!(
            RepositoryError::article_not_found(1).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RepositoryError::QueryFailed(String::new()).kind(),
            ErrorKind::DataIntegrity
        );
        assert_eq!(
            RepositoryError::InvalidData(String::new()).kind(),
            ErrorKind::DataIntegrity
        );
        assert_eq!(
            RepositoryError::Serialization(String::new()).kind(),
            ErrorKind::DataIntegrity
        );
    }
}
