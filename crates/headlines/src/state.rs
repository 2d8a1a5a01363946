//! Application state shared by all request handlers.

use std::sync::Arc;

use headlines_core::cache::ArticleCache;
use headlines_core::source::ArticleSource;
use headlines_core::storage::ArticleRepository;

use crate::config::Config;
use crate::service::{ReadThrough, ViewCounter, ViewWorker};

/// Shared application state.
///
/// Cloned for each request. The tiers are constructed once at startup and
/// shared by the read-through service and the health probe.
#[derive(Clone)]
pub struct AppState {
    /// Read-through orchestrator behind every article route.
    pub service: Arc<ReadThrough>,
    /// Cache tier, pinged by `/healthz`.
    pub cache: Arc<dyn ArticleCache>,
    /// Store tier, pinged by `/healthz`.
    pub store: Arc<dyn ArticleRepository>,
}

impl AppState {
    /// Wires the tiers together and spawns the view counter worker.
    ///
    /// The returned worker must be shut down after the server stops so that
    /// queued view increments are applied.
    pub fn new(
        cache: Arc<dyn ArticleCache>,
        store: Arc<dyn ArticleRepository>,
        source: Arc<dyn ArticleSource>,
        config: &Config,
    ) -> (Self, ViewWorker) {
        let (views, worker) = ViewCounter::spawn(
            cache.clone(),
            store.clone(),
            config.view_queue_capacity,
            config.view_concurrency,
            config.tier_timeout(),
        );

        let service = Arc::new(ReadThrough::new(
            cache.clone(),
            store.clone(),
            source,
            views,
            config.tier_timeout(),
        ));

        (
            Self {
                service,
                cache,
                store,
            },
            worker,
        )
    }
}
