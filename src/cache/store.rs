//! Cache Store Module
//!
//! Main cache engine: a HashMap of TTL-stamped entries behind a single
//! store-wide reader/writer lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::CacheEntry;

// == Cache Trait ==
/// Public key/value operations with optional per-entry expiration.
///
/// Every operation is total: a missing or expired key is reported as `None`
/// from [`Cache::get`], never as an error.
pub trait Cache<V> {
    /// Stores `value` under `key` without expiration, replacing any prior entry.
    fn set(&self, key: impl Into<String>, value: V);

    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A zero `ttl` behaves exactly like [`Cache::set`].
    fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration);

    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed from the store before returning `None`.
    fn get(&self, key: &str) -> Option<V>;

    /// Removes `key`. Absent keys are a no-op.
    fn delete(&self, key: &str);

    /// Removes every entry.
    fn clear(&self);
}

// == In-Memory Cache ==
/// Thread-safe in-memory cache with TTL support.
///
/// Share it across threads or tasks with an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct InMemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> InMemoryCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // == Length ==
    /// Returns the number of entries physically held, expired or not.
    ///
    /// Unlike [`Cache::get`] this never triggers lazy deletion, so it reflects
    /// exactly what the sweeper has or has not removed yet.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    /// Returns true if no entries are physically held.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns true if `key` holds a live entry. Does not remove anything.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Remaining lifetime of `key`, or None if it is missing, expired, or
    /// never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.is_expired_at(now) {
            return None;
        }
        entry.ttl_remaining_at(now)
    }

    // == Evict Expired ==
    /// Removes every entry expired as of a single instant captured for the pass.
    ///
    /// The write lock is held across the whole scan so concurrent callers see
    /// the store either before or after the pass, never midway. Returns the
    /// evicted keys.
    pub(crate) fn evict_expired(&self) -> Vec<String> {
        let now = Instant::now();
        let mut evicted = Vec::new();

        let mut entries = self.entries.write();
        entries.retain(|key, entry| {
            if entry.is_expired_at(now) {
                evicted.push(key.clone());
                false
            } else {
                true
            }
        });

        evicted
    }

    /// Removes `key` only if it is still expired as of `now`.
    ///
    /// Another reader may have removed it already, or a writer may have
    /// replaced it with a fresh entry since the read lock was released; both
    /// leave the map untouched.
    fn remove_if_expired(&self, key: &str, now: Instant) {
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
            entries.remove(key);
        }
    }

    fn insert(&self, key: String, entry: CacheEntry<V>) {
        self.entries.write().insert(key, entry);
    }
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Cache<V> for InMemoryCache<V> {
    // == Set ==
    fn set(&self, key: impl Into<String>, value: V) {
        self.insert(key.into(), CacheEntry::new(value));
    }

    fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.insert(key.into(), CacheEntry::with_ttl(value, ttl));
    }

    // == Get ==
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if !entry.is_expired_at(now) {
                return Some(entry.value.clone());
            }
        }

        // Read lock is released before taking the write lock
        self.remove_if_expired(key, now);
        None
    }

    // == Delete ==
    fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    // == Clear ==
    fn clear(&self) {
        let mut entries = self.entries.write();
        *entries = HashMap::new();
    }
}
