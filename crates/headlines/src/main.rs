mod app;
mod cache;
mod config;
mod handlers;
mod service;
mod source;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use headlines_core::cache::ArticleCache;

use crate::{
    app::create_app, config::Config, source::NewsApiSource, state::AppState,
    storage::SqliteRepository,
};

/// Headlines - Yesterday's news by category, cache first
#[derive(Parser, Debug)]
#[command(name = "headlines")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headlines=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.news_api_key.is_empty() {
        tracing::warn!("NEWS_API_KEY is not set, upstream fetches will be rejected");
    }

    let cache = init_cache(&config).await?;
    let store = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
    let source = Arc::new(NewsApiSource::new(
        config.news_api_url.clone(),
        config.news_api_key.clone(),
        config.upstream_timeout(),
    )?);

    let (state, views) = AppState::new(cache, store, source, &config);
    let app = create_app(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Apply the view increments still queued.
    views.shutdown().await;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the cache backend selected at compile time.
#[cfg(feature = "memory")]
async fn init_cache(config: &Config) -> Result<Arc<dyn ArticleCache>> {
    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Ok(Arc::new(cache::MemoryCache::new(config.cache_max_entries)))
}

/// Builds the cache backend selected at compile time.
#[cfg(feature = "redis")]
async fn init_cache(config: &Config) -> Result<Arc<dyn ArticleCache>> {
    tracing::info!(url = %config.redis_url, "Connecting to Redis cache");
    Ok(Arc::new(cache::RedisCache::new(&config.redis_url).await?))
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
