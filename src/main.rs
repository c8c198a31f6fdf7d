//! TTL Stash - example driver
//!
//! Stores one entry with a TTL, runs the expiration sweeper, and polls the
//! entry until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_stash::{spawn_cache_worker, Cache, Config, InMemoryCache};

const EXAMPLE_KEY: &str = "example";

/// Main entry point for the example driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the cache and store the example entry
/// 4. Start the expiration sweeper
/// 5. Poll the example entry until Ctrl+C/SIGTERM
/// 6. Stop the sweeper and wait for it within the grace period
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_stash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: sweep_interval={:?}, default_ttl={:?}, poll_interval={:?}, shutdown_grace={:?}",
        config.sweep_interval, config.default_ttl, config.poll_interval, config.shutdown_grace
    );

    let cache = Arc::new(InMemoryCache::new());
    cache.set_with_ttl(EXAMPLE_KEY, "Hello, Cache!".to_string(), config.default_ttl);

    let token = CancellationToken::new();
    let (worker, stop) = spawn_cache_worker(cache.clone(), config.sweep_interval, token.clone())?;

    info!("Application started. Press Ctrl+C to exit.");

    let mut ticker = tokio::time::interval(config.poll_interval);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match cache.get(EXAMPLE_KEY) {
                    Some(value) => info!("Key '{}' found with value: {}", EXAMPLE_KEY, value),
                    None => info!("Key '{}' not found or expired.", EXAMPLE_KEY),
                }
            }
            signal = &mut shutdown => {
                let name = signal.context("failed to install signal handler")?;
                info!("Received {}, shutting down.", name);
                break;
            }
        }
    }

    // Either signal alone stops the worker
    if stop.send(()).is_err() {
        warn!("Cache worker already stopped");
    }
    token.cancel();

    worker
        .wait(config.shutdown_grace)
        .await
        .context("cache worker did not shut down cleanly")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM and returns which one arrived.
async fn shutdown_signal() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            res = signal::ctrl_c() => res.map(|_| "Ctrl+C"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.map(|_| "Ctrl+C")
    }
}
