// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key/value cache with per-entry TTL.
//!
//! The cache namespace is shared: the signature cache writes `sign-*` keys,
//! other subsystems use their own prefixes. Nothing here assumes exclusive
//! ownership of a key space.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Generic string cache with TTL support.
pub trait CacheStore: Send + Sync {
    /// Get a live value. Expired entries read as `None`.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process LRU cache with per-entry expiry.
pub struct TtlCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
}

impl TtlCache {
    /// Create a cache holding at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl CacheStore for TtlCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        if let Some(entry) = cache.get(key) {
            if Instant::now() < entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
            // Expired, drop it
            cache.pop(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        cache.put(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
