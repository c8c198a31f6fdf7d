//! Expiration Sweeper
//!
//! Background task that periodically evicts expired cache entries until it is
//! cancelled or told to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::InMemoryCache;
use crate::error::{Result, StashError};

// == Worker State ==
/// Lifecycle of a cache worker. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopped,
}

// == Worker Config ==
/// Everything a worker needs besides its cancellation token.
#[derive(Debug)]
pub struct WorkerConfig<V> {
    /// Cache to sweep
    pub cache: Arc<InMemoryCache<V>>,
    /// Interval between sweeps
    pub interval: Duration,
    /// Fires on send, or when the sender is dropped
    pub stop: oneshot::Receiver<()>,
}

// == Cache Worker ==
/// An idle sweeper. [`CacheWorker::start`] consumes it, so a stopped worker
/// can only be replaced, never restarted.
#[derive(Debug)]
pub struct CacheWorker<V> {
    config: WorkerConfig<V>,
}

impl<V> CacheWorker<V>
where
    V: Send + Sync + 'static,
{
    pub fn new(config: WorkerConfig<V>) -> Self {
        Self { config }
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::Idle
    }

    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// The loop exits as soon as `token` (or any of its parents) is cancelled
    /// or the stop signal fires, whichever comes first.
    ///
    /// # Errors
    /// Returns [`StashError::InvalidInterval`] for a zero interval.
    pub fn start(self, token: CancellationToken) -> Result<WorkerHandle> {
        let WorkerConfig {
            cache,
            interval,
            stop,
        } = self.config;

        if interval.is_zero() {
            return Err(StashError::InvalidInterval(interval));
        }

        let token = token.child_token();
        let stopped = Arc::new(AtomicBool::new(false));
        let join = tokio::spawn(run(
            cache,
            interval,
            stop,
            token.clone(),
            StoppedGuard(stopped.clone()),
        ));

        Ok(WorkerHandle {
            join,
            token,
            stopped,
        })
    }
}

/// Spawns a worker with its own stop channel.
///
/// Returns the handle and the stop sender; sending on it or dropping it stops
/// the worker.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(InMemoryCache::<String>::new());
/// let (handle, stop) = spawn_cache_worker(cache.clone(), Duration::from_secs(2), CancellationToken::new())?;
/// // Later, during shutdown:
/// let _ = stop.send(());
/// handle.wait(Duration::from_secs(1)).await?;
/// ```
pub fn spawn_cache_worker<V>(
    cache: Arc<InMemoryCache<V>>,
    interval: Duration,
    token: CancellationToken,
) -> Result<(WorkerHandle, oneshot::Sender<()>)>
where
    V: Send + Sync + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel();
    let handle = CacheWorker::new(WorkerConfig {
        cache,
        interval,
        stop: stop_rx,
    })
    .start(token)?;

    Ok((handle, stop_tx))
}

// == Worker Handle ==
/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    join: JoinHandle<()>,
    token: CancellationToken,
    stopped: Arc<AtomicBool>,
}

impl WorkerHandle {
    pub fn state(&self) -> WorkerState {
        if self.stopped.load(Ordering::Acquire) {
            WorkerState::Stopped
        } else {
            WorkerState::Running
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Requests the worker to stop without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits up to `grace` for the worker to exit.
    ///
    /// # Errors
    /// - [`StashError::ShutdownTimeout`] if it is still running after `grace`;
    ///   the task is aborted before returning.
    /// - [`StashError::WorkerPanicked`] if the task panicked.
    pub async fn wait(self, grace: Duration) -> Result<()> {
        let mut join = self.join;
        match time::timeout(grace, &mut join).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) if err.is_panic() => Err(StashError::WorkerPanicked(err.to_string())),
            Ok(Err(_)) => Ok(()),
            Err(_) => {
                join.abort();
                warn!("Cache worker: still running after {:?}, aborted", grace);
                Err(StashError::ShutdownTimeout(grace))
            }
        }
    }

    /// Cancels the worker and waits up to `grace` for it to exit.
    pub async fn shutdown(self, grace: Duration) -> Result<()> {
        self.cancel();
        self.wait(grace).await
    }
}

// Marks the worker stopped however the task ends, including abort and panic.
struct StoppedGuard(Arc<AtomicBool>);

impl Drop for StoppedGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

async fn run<V>(
    cache: Arc<InMemoryCache<V>>,
    interval: Duration,
    mut stop: oneshot::Receiver<()>,
    token: CancellationToken,
    _stopped: StoppedGuard,
) {
    // First tick one interval from now rather than immediately
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Cache worker started with interval of {:?}", interval);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("Cache worker: cancellation requested, stopping worker");
                break;
            }
            _ = &mut stop => {
                info!("Cache worker: stop signal received, stopping worker");
                break;
            }
            _ = ticker.tick() => {
                sweep(&cache);
            }
        }
    }
}

fn sweep<V>(cache: &InMemoryCache<V>) -> usize {
    let evicted = cache.evict_expired();

    for key in &evicted {
        debug!("Cache worker: deleted expired key: {}", key);
    }

    if evicted.is_empty() {
        debug!("Cache worker: no expired entries found");
    } else {
        info!("Cache worker: removed {} expired entries", evicted.len());
    }

    evicted.len()
}
