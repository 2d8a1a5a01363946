//! Per-call time budgets for tier calls.
//!
//! A call that outlives its budget fails with the tier's connectivity
//! error, so the fallback policy treats it like an unreachable tier.

use std::future::Future;
use std::time::Duration;

use headlines_core::cache::CacheError;
use headlines_core::storage::RepositoryError;

/// Tier errors that can represent an elapsed budget.
pub(crate) trait Elapsed {
    fn elapsed(operation: &'static str, budget: Duration) -> Self;
}

impl Elapsed for CacheError {
    fn elapsed(operation: &'static str, budget: Duration) -> Self {
        CacheError::ConnectionFailed(format!("{operation} timed out after {budget:?}"))
    }
}

impl Elapsed for RepositoryError {
    fn elapsed(operation: &'static str, budget: Duration) -> Self {
        RepositoryError::ConnectionFailed(format!("{operation} timed out after {budget:?}"))
    }
}

/// Runs `call`, failing with `E::elapsed` if it does not finish within `budget`.
pub(crate) async fn bounded<T, E, F>(
    budget: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, E>
where
    E: Elapsed,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?budget, "Tier call timed out");
            Err(E::elapsed(operation, budget))
        }
    }
}
