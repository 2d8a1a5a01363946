/// Tier-independent classification of a failure.
///
/// Every tier error reports one of these kinds; the read-through service
/// decides whether to fall back, fail, or report a miss by matching on the
/// kind instead of on backend-specific error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The tier could not be reached or did not answer in time.
    TransientConnectivity,
    /// The tier answered, but with data or a query that cannot be used.
    DataIntegrity,
    /// The upstream API refused the request or could not be reached. The
    /// category degrades to empty; it never fails a request.
    UpstreamContentError,
    /// The requested record does not exist in the tier.
    NotFound,
}

impl ErrorKind {
    /// Returns true when the next tier should be consulted.
    pub fn triggers_fallback(self) -> bool {
        matches!(self, ErrorKind::TransientConnectivity | ErrorKind::NotFound)
    }
}
