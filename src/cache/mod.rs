//! In-memory cache for provider responses
//!
//! This module provides a TTL cache keyed by provider and request parameters.
//! Entries expire lazily: an expired entry is only removed when it is read, or
//! when the cache needs room for a new key.

mod manager;

pub use manager::{TtlCache, DEFAULT_CAPACITY};
