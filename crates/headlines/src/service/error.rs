use thiserror::Error;

use headlines_core::cache::CacheError;
use headlines_core::storage::RepositoryError;
use headlines_core::ErrorKind;

/// Terminal failure of a read-through request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No remaining tier could be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// A tier answered with data that cannot be used.
    #[error("data integrity failure: {0}")]
    DataIntegrity(String),
    #[error("article not found: {0}")]
    NotFound(i64),
    /// A tier broke an invariant the service relies on.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl ServiceError {
    /// Classifies a store failure for article `id`, if there is one.
    pub(crate) fn from_store(err: &RepositoryError, id: Option<i64>) -> Self {
        match (err.kind(), id) {
            (ErrorKind::NotFound, Some(id)) => ServiceError::NotFound(id),
            (ErrorKind::TransientConnectivity, _) => ServiceError::Unavailable(err.to_string()),
            (ErrorKind::DataIntegrity, _) => ServiceError::DataIntegrity(err.to_string()),
            (ErrorKind::NotFound | ErrorKind::UpstreamContentError, _) => {
                ServiceError::Unexpected(err.to_string())
            }
        }
    }

    /// Classifies a cache failure that cannot be recovered by falling back.
    pub(crate) fn from_cache(err: &CacheError) -> Self {
        match err.kind() {
            ErrorKind::TransientConnectivity => ServiceError::Unavailable(err.to_string()),
            ErrorKind::DataIntegrity => ServiceError::DataIntegrity(err.to_string()),
            ErrorKind::NotFound | ErrorKind::UpstreamContentError => {
                ServiceError::Unexpected(err.to_string())
            }
        }
    }
}

/// Maps a ServiceError to an HTTP status code.
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Unavailable(_) => 503,
        ServiceError::DataIntegrity(_) => 500,
        ServiceError::NotFound(_) => 404,
        ServiceError::Unexpected(_) => 500,
    }
}
