// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded in-process cache with LRU eviction and per-entry max-age

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    types::{AccessSequence, TimestampMillis},
    CacheBackend, CacheKey, CacheStats,
};
use crate::errors::CacheError;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    created_at: TimestampMillis,
    /// Freshness hint supplied by the writer
    max_age: Duration,
    last_accessed: TimestampMillis,
    access_seq: AccessSequence,
}

impl CacheEntry {
    fn new(value: Value, max_age: Duration, access_seq: AccessSequence) -> Self {
        let now = TimestampMillis::now();
        Self {
            value,
            created_at: now,
            max_age,
            last_accessed: now,
            access_seq,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.is_older_than(self.max_age)
    }

    fn touch(&mut self, access_seq: AccessSequence) {
        self.last_accessed = TimestampMillis::now();
        self.access_seq = access_seq;
    }
}

#[derive(Debug, Default)]
struct MemoryCacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

/// In-process cache holding at most `capacity` entries
///
/// Each entry expires once older than the max-age it was written with. When
/// full, the least recently used entry is evicted to make room. Every
/// `get`/`set` runs under a single lock, so operations are atomic with
/// respect to each other.
///
/// # Examples
///
/// ```rust
/// use explorer_core::cache::{CacheBackend, CacheKey, MemoryCache};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # tokio_test_block_on(async {
/// let cache = MemoryCache::new(50);
/// cache
///     .set(&CacheKey::BlockByHeight(1), json!({"height": 1}), Duration::from_secs(3600))
///     .await
///     .unwrap();
/// assert!(cache.get(&CacheKey::BlockByHeight(1)).await.unwrap().is_some());
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryCache {
    capacity: usize,
    state: Mutex<MemoryCacheState>,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(MemoryCacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_lru(state: &mut MemoryCacheState) {
        if state.entries.is_empty() {
            return;
        }

        // Least recently used by timestamp, then by sequence number
        let lru_key = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.last_accessed, entry.access_seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            debug!(key = %key, "Evicting LRU cache entry");
            state.entries.remove(&key);
            state.stats.evictions += 1;
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let key = key.to_string();
        let mut state = self.state.lock().await;
        let seq = state.next_seq;

        let (result, expired) = match state.entries.get_mut(&key) {
            Some(entry) if entry.is_expired() => (None, true),
            Some(entry) => {
                entry.touch(seq);
                (Some(entry.value.clone()), false)
            }
            None => (None, false),
        };

        if expired {
            debug!(key = %key, "Cache entry expired");
            state.entries.remove(&key);
            state.stats.expirations += 1;
            state.stats.entries = state.entries.len();
        }

        if result.is_some() {
            state.next_seq = state.next_seq.next();
            state.stats.hits += 1;
            debug!(key = %key, "Cache hit (memory)");
        } else {
            state.stats.misses += 1;
            debug!(key = %key, "Cache miss (memory)");
        }

        Ok(result)
    }

    async fn set(&self, key: &CacheKey, value: Value, max_age: Duration) -> Result<(), CacheError> {
        let key = key.to_string();
        let mut state = self.state.lock().await;

        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.capacity {
                Self::evict_lru(&mut state);
            }
        }

        debug!(key = %key, max_age_ms = max_age.as_millis() as u64, "Inserting entry into memory cache");
        let seq = state.next_seq;
        state.next_seq = state.next_seq.next();
        state
            .entries
            .insert(key, CacheEntry::new(value, max_age, seq));
        state.stats.entries = state.entries.len();

        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut state = self.state.lock().await;
        debug!(entries = state.entries.len(), "Clearing memory cache");
        state.entries.clear();
        state.stats.entries = 0;
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        state.stats.clone()
    }

    fn name(&self) -> &'static str {
        "MemoryCache"
    }
}
