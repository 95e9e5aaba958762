//! TTL cache for provider payloads
//!
//! Provides a `TtlCache` that stores values with a per-entry time-to-live and a
//! capacity bound, serializing all access behind a single mutex.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default maximum number of entries held by a cache
pub const DEFAULT_CAPACITY: usize = 256;

/// A single cached value with its expiry metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The cached data
    data: V,
    /// When the data was cached
    inserted_at: Instant,
    /// How long the entry stays fresh
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

/// Key-value store where each entry expires after its own TTL
///
/// Reads of an expired entry return `None` and delete the entry. There is no
/// background sweep. When a new key is inserted at capacity, expired entries
/// are purged first and then the oldest entry is evicted.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    capacity: usize,
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty cache holding at most `capacity` entries
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of entries this cache holds
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads a fresh value from the cache
    ///
    /// # Returns
    /// * `Some(V)` if the key is present and younger than its TTL
    /// * `None` if the key is absent or expired (expired entries are removed)
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`TtlCache::get`], evaluated at the given instant
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let expired = entries.get(key)?.is_expired(now);
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.data.clone())
    }

    /// Inserts or overwrites a value with the given TTL
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    /// Same as [`TtlCache::set`], stamping the entry with the given instant
    pub fn set_at(&self, key: impl Into<String>, value: V, ttl: Duration, now: Instant) {
        let key = key.into();
        let mut entries = self.lock();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, entry| !entry.is_expired(now));

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!(key = %oldest, "Evicting oldest cache entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                data: value,
                inserted_at: now,
                ttl,
            },
        );
    }

    /// Removes an entry regardless of freshness
    pub fn remove(&self, key: &str) -> Option<V> {
        self.lock().remove(key).map(|entry| entry.data)
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
