// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache backends for node RPC results
//!
//! Three interchangeable backends sit behind [`CacheBackend`]:
//!
//! - [`NoOpCache`]: always misses (caching disabled)
//! - [`MemoryCache`]: bounded in-process LRU with per-entry max-age
//! - [`RedisCache`]: external cache shared between processes
//!
//! [`CachePools`] groups the three named pools (misc, block, transaction)
//! every aggregation reads through. It is built once at startup by
//! [`CachePools::select`] and handed to [`CoreApi`](crate::CoreApi).
//!
//! # Examples
//!
//! ```rust,ignore
//! use explorer_core::cache::CachePools;
//! use explorer_core::CacheConfig;
//!
//! // Memory pools with default capacities (50 / 50 / 200)
//! let pools = CachePools::select(&CacheConfig::default()).await;
//!
//! // Everything goes to the node
//! let pools = CachePools::disabled();
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Instrument};

use crate::config::CacheConfig;
use crate::errors::CacheError;
use crate::spans;

mod fetch;
mod key;
mod memory;
mod noop;
mod redis;
mod types;

pub use fetch::{fetch_cached, fetch_required, should_cache_transaction};
pub use key::CacheKey;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use self::redis::RedisCache;
pub use types::{AccessSequence, TimestampMillis};

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits (successful retrievals)
    pub hits: u64,
    /// Number of cache misses (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to capacity
    pub evictions: u64,
    /// Number of entries dropped because they outlived their max-age
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.entries,
            self.hit_rate()
        )
    }
}

/// A key/value store for JSON-encoded RPC results with a per-write max-age
///
/// # Thread Safety
///
/// Implementations are shared by every concurrent request. Each individual
/// `get`/`set` must be atomic; no multi-key consistency is required.
///
/// # Error Handling
///
/// Errors are reported to the caller, which is expected to log them and
/// treat the lookup as a miss (see [`fetch_cached`]).
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value, or `None` if absent or expired.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Stores `value`; it should not be served once older than `max_age`.
    async fn set(&self, key: &CacheKey, value: Value, max_age: Duration) -> Result<(), CacheError>;

    /// Clears all entries owned by this backend.
    async fn clear(&self) -> Result<(), CacheError>;

    async fn stats(&self) -> CacheStats;

    /// Human-readable backend name for logging
    fn name(&self) -> &'static str;
}

/// The three named cache pools shared by all aggregations
///
/// Blocks and transactions get their own pools so that high-churn
/// miscellaneous results (peer info, mempool snapshots) cannot evict them.
#[derive(Clone)]
pub struct CachePools {
    /// Node status, mempool, peers, UTXOs, addresses and help text
    pub misc: Arc<dyn CacheBackend>,
    pub block: Arc<dyn CacheBackend>,
    pub tx: Arc<dyn CacheBackend>,
}

impl fmt::Debug for CachePools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePools")
            .field("misc", &self.misc.name())
            .field("block", &self.block.name())
            .field("tx", &self.tx.name())
            .finish()
    }
}

/// Per-pool statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachePoolStats {
    pub misc: CacheStats,
    pub block: CacheStats,
    pub tx: CacheStats,
}

impl CachePools {
    /// All three pools miss on every lookup.
    pub fn disabled() -> Self {
        Self::shared(Arc::new(NoOpCache))
    }

    /// Independent in-process pools with the given capacities.
    pub fn in_memory(misc_capacity: usize, block_capacity: usize, tx_capacity: usize) -> Self {
        Self {
            misc: Arc::new(MemoryCache::new(misc_capacity)),
            block: Arc::new(MemoryCache::new(block_capacity)),
            tx: Arc::new(MemoryCache::new(tx_capacity)),
        }
    }

    /// All three pools alias one backend.
    pub fn shared(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            misc: backend.clone(),
            block: backend.clone(),
            tx: backend,
        }
    }

    /// Applies the startup selection policy.
    ///
    /// 1. Caching disabled: every pool is a [`NoOpCache`].
    /// 2. Redis configured and answering: every pool aliases it.
    /// 3. Otherwise: independent [`MemoryCache`] pools.
    ///
    /// An unreachable Redis is logged and falls through to memory pools.
    pub async fn select(config: &CacheConfig) -> Self {
        let span = spans::select_cache_pools(
            config.redis_url.is_some(),
            config.no_inmemory_rpc_cache,
        );
        Self::select_inner(config).instrument(span).await
    }

    async fn select_inner(config: &CacheConfig) -> Self {
        if config.no_inmemory_rpc_cache {
            info!("RPC caching disabled");
            return Self::disabled();
        }

        if let Some(url) = &config.redis_url {
            match RedisCache::connect(url, config.redis_prefix.clone()).await {
                Ok(redis) => {
                    info!(prefix = %config.redis_prefix, "Using redis for RPC caching");
                    return Self::shared(Arc::new(redis));
                }
                Err(error) => {
                    warn!(error = %error, "Redis unavailable; falling back to in-memory caches");
                }
            }
        }

        info!(
            misc = config.misc_capacity,
            block = config.block_capacity,
            tx = config.tx_capacity,
            "Using in-memory RPC caches"
        );
        Self::in_memory(
            config.misc_capacity,
            config.block_capacity,
            config.tx_capacity,
        )
    }

    pub async fn stats(&self) -> CachePoolStats {
        CachePoolStats {
            misc: self.misc.stats().await,
            block: self.block.stats().await,
            tx: self.tx.stats().await,
        }
    }
}
