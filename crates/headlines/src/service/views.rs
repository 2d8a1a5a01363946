//! Background view counting for detail reads.
//!
//! A detail read only enqueues its article id. The worker applies up to
//! `concurrency` increments at once, each to the cache and the store
//! concurrently, so a read never waits on either write. Ids stay queued while
//! every slot is busy; once the queue is full too, new increments are dropped
//! with a warning.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinHandle, JoinSet};

use headlines_core::cache::{ArticleCache, CacheError};
use headlines_core::storage::{ArticleRepository, RepositoryError};

use super::deadline::bounded;

/// Enqueues view increments. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ViewCounter {
    tx: mpsc::Sender<i64>,
}

/// Handle to the worker task that applies increments.
#[derive(Debug)]
pub struct ViewWorker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ViewCounter {
    /// Spawns the worker and returns the counter feeding it.
    ///
    /// # Arguments
    ///
    /// * `cache` / `store` - Tiers whose `views` are incremented
    /// * `capacity` - Maximum pending increments before new ones are dropped
    /// * `concurrency` - Increments applied at the same time
    /// * `budget` - Time budget of each tier call
    pub fn spawn(
        cache: Arc<dyn ArticleCache>,
        store: Arc<dyn ArticleRepository>,
        capacity: usize,
        concurrency: usize,
        budget: Duration,
    ) -> (Self, ViewWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let tiers = Tiers {
            cache,
            store,
            budget,
        };

        let handle = tokio::spawn(run(tiers, rx, shutdown_rx, concurrency.max(1)));

        (
            Self { tx },
            ViewWorker {
                shutdown: shutdown_tx,
                handle,
            },
        )
    }

    /// Records one view of article `id` without waiting for it to apply.
    pub fn record(&self, id: i64) {
        match self.tx.try_send(id) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(article_id = id, "View queue full, dropping increment");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(article_id = id, "View worker stopped, dropping increment");
            }
        }
    }
}

impl ViewWorker {
    /// Stops accepting increments, applies the queued ones and waits for the
    /// worker to exit.
    pub async fn shutdown(self) {
        // The worker may already have exited because every counter was dropped.
        let _ = self.shutdown.send(());

        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "View worker panicked");
        }
    }
}

#[derive(Clone)]
struct Tiers {
    cache: Arc<dyn ArticleCache>,
    store: Arc<dyn ArticleRepository>,
    budget: Duration,
}

impl Tiers {
    fn spawn_apply(&self, tasks: &mut JoinSet<()>, permit: OwnedSemaphorePermit, id: i64) {
        let tiers = self.clone();
        tasks.spawn(async move {
            apply(tiers.cache.as_ref(), tiers.store.as_ref(), id, tiers.budget).await;
            drop(permit);
        });
    }
}

async fn run(
    tiers: Tiers,
    mut rx: mpsc::Receiver<i64>,
    mut shutdown: oneshot::Receiver<()>,
    concurrency: usize,
) {
    tracing::debug!(concurrency, "View worker started");

    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    loop {
        // Nothing is dequeued until a slot is free.
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(id) => tiers.spawn_apply(&mut tasks, permit, id),
                None => break,
            },
            _ = &mut shutdown => {
                drop(permit);
                rx.close();
                let mut drained = 0usize;
                while let Some(id) = rx.recv().await {
                    let Ok(permit) = permits.clone().acquire_owned().await else {
                        break;
                    };
                    tiers.spawn_apply(&mut tasks, permit, id);
                    drained += 1;
                }
                tracing::debug!(drained, "View queue drained");
                break;
            }
        }

        while let Some(result) = tasks.try_join_next() {
            log_panic(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_panic(result);
    }

    tracing::debug!("View worker stopped");
}

fn log_panic(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "View increment task panicked");
    }
}

async fn apply(cache: &dyn ArticleCache, store: &dyn ArticleRepository, id: i64, budget: Duration) {
    let (cached, stored) = tokio::join!(
        bounded(budget, "cache.increment_view", cache.increment_view(id, 1)),
        bounded(budget, "store.increment_view", store.increment_view(id)),
    );

    match cached {
        Ok(()) => {}
        // Not cached yet; the next backfill copies the store's count.
        Err(CacheError::NotFound(_)) => {
            tracing::trace!(article_id = id, "View not cached");
        }
        Err(e) => tracing::warn!(article_id = id, error = %e, "Failed to count view in cache"),
    }

    match stored {
        Ok(()) => {}
        Err(e @ RepositoryError::NotFound { .. }) => {
            tracing::debug!(article_id = id, error = %e, "View for unknown article");
        }
        Err(e) => tracing::warn!(article_id = id, error = %e, "Failed to count view in store"),
    }
}
