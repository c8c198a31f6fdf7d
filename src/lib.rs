//! TTL Stash - An in-process key/value cache
//!
//! Provides get/set/delete/clear with optional per-entry TTL and a background
//! worker that sweeps expired entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, InMemoryCache};
pub use config::Config;
pub use error::{Result, StashError};
pub use tasks::{spawn_cache_worker, CacheWorker, WorkerConfig, WorkerHandle, WorkerState};
