//! Error types for the cache and its sweeper
//!
//! Store operations never fail; these errors only arise at the sweeper and
//! configuration boundary.

use std::time::Duration;

use thiserror::Error;

// == Stash Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum StashError {
    /// Sweeper interval must be positive
    #[error("Invalid sweep interval: {0:?}")]
    InvalidInterval(Duration),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker did not stop within the grace period
    #[error("Cache worker did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    /// Worker task panicked
    #[error("Cache worker panicked: {0}")]
    WorkerPanicked(String),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, StashError>;
