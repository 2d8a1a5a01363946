use thiserror::Error;

use crate::ErrorKind;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache record failed validation: {0}")]
    Validation(String),
    #[error("Cache record not found: {0}")]
    NotFound(String),
}

impl CacheError {
    /// Classifies the error for the read-through fallback policy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::ConnectionFailed(_) => ErrorKind::TransientConnectivity,
            CacheError::NotFound(_) => ErrorKind::NotFound,
            CacheError::OperationFailed(_) | CacheError::Validation(_) => ErrorKind::DataIntegrity,
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
