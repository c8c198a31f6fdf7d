//! Cache Module
//!
//! Provides an in-memory key/value store with per-entry TTL expiration.

mod entry;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use store::{Cache, InMemoryCache};
