// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared external cache backed by Redis

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::{CacheBackend, CacheKey, CacheStats};
use crate::errors::CacheError;

const BACKEND: &str = "RedisCache";

/// Cache stored in Redis as JSON strings with a millisecond expiry
///
/// Keys are namespaced with a prefix so several explorers can share one
/// Redis instance. Expiry is delegated to Redis (`SET .. PX`). A clone shares
/// the same multiplexed connection.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    prefix: String,
    hits: std::sync::Arc<AtomicU64>,
    misses: std::sync::Arc<AtomicU64>,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects to `url` and verifies the server answers `PING`.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::backend(BACKEND, format!("invalid url {url}"), Some(Box::new(e))))?;
        let mut connection = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::backend(BACKEND, "connect", Some(Box::new(e))))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::backend(BACKEND, "PING", Some(Box::new(e))))?;
        debug!(url, reply = %pong, "Connected to redis");

        Ok(Self {
            connection,
            prefix: prefix.into(),
            hits: Default::default(),
            misses: Default::default(),
        })
    }

    fn storage_key(&self, key: &CacheKey) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let storage_key = self.storage_key(key);
        let mut connection = self.connection.clone();

        let raw: Option<String> = redis::cmd("GET")
            .arg(&storage_key)
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::backend(BACKEND, format!("GET {storage_key}"), Some(Box::new(e))))?;

        match raw {
            Some(raw) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit (redis)");
                serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|e| CacheError::serialization(storage_key, e))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss (redis)");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: Value, max_age: Duration) -> Result<(), CacheError> {
        let storage_key = self.storage_key(key);
        let payload =
            serde_json::to_string(&value).map_err(|e| CacheError::serialization(&storage_key, e))?;
        let millis = (max_age.as_millis() as u64).max(1);
        let mut connection = self.connection.clone();

        let () = redis::cmd("SET")
            .arg(&storage_key)
            .arg(payload)
            .arg("PX")
            .arg(millis)
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::backend(BACKEND, format!("SET {storage_key}"), Some(Box::new(e))))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        let pattern = format!("{}*", self.prefix);

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::backend(BACKEND, format!("KEYS {pattern}"), Some(Box::new(e))))?;
        if keys.is_empty() {
            return Ok(());
        }

        debug!(entries = keys.len(), "Clearing redis cache");
        let () = redis::cmd("DEL")
            .arg(&keys)
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::backend(BACKEND, "DEL", Some(Box::new(e))))?;
        Ok(())
    }

    /// Hit/miss counters are local to this process; entry counts are not tracked.
    async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }

    fn name(&self) -> &'static str {
        BACKEND
    }
}
