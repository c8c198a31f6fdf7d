//! Background Tasks Module
//!
//! Contains the background worker that runs alongside the cache.
//!
//! # Tasks
//! - Expiration sweeper: evicts expired cache entries at a fixed interval

mod worker;

pub use worker::{spawn_cache_worker, CacheWorker, WorkerConfig, WorkerHandle, WorkerState};
