use std::fmt;

use thiserror::Error;

use crate::ErrorKind;

/// Status reported by a failed upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The remote API answered with a non-success status.
    Http(u16),
    /// The request never produced a usable response.
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Http(code) => write!(f, "{code}"),
            FetchStatus::Error => f.write_str("error"),
        }
    }
}

/// A failed fetch of one category. Always recoverable: the category is
/// treated as empty for the current round.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("upstream fetch failed ({status}): {message}")]
pub struct FetchError {
    pub status: FetchStatus,
    pub message: String,
    pub description: Option<String>,
}

impl FetchError {
    /// A non-success answer from the remote API.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Http(status),
            message: message.into(),
            description: None,
        }
    }

    /// A transport-level failure.
    pub fn transport(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Error,
            message: message.into(),
            description: Some(description.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UpstreamContentError
    }
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fetch_failure_is_upstream_content_error() {
        assert_eq!(
            FetchError::http(401, "apiKeyInvalid").kind(),
            ErrorKind::UpstreamContentError
        );
        assert_eq!(
            FetchError::transport("connection failed", "refused").kind(),
            ErrorKind::UpstreamContentError
        );
    }

    #[test]
    fn test_http_error_display() {
        let error = FetchError::http(429, "rateLimited");
        assert_eq!(error.to_string(), "upstream fetch failed (429): rateLimited");
        assert_eq!(error.description, None);
    }

    #[test]
    fn test_transport_error_display() {
        let error = FetchError::transport("request failed", "connection refused");
        assert_eq!(
            error.to_string(),
            "upstream fetch failed (error): request failed"
        );
        assert_eq!(error.description.as_deref(), Some("connection refused"));
    }
}
