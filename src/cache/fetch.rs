// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The cache-or-fetch primitive every fetch wrapper is built on.
//!
//! Cache failures never fail a request: a lookup error or an undecodable
//! entry is logged with its key and treated as a miss, and a failed write is
//! logged and dropped. Fetch failures always propagate.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CacheBackend, CacheKey};
use crate::config::constants::MAX_CACHEABLE_TX_INPUTS;
use crate::rpc::Transaction;

/// Returns the cached value for `key`, else runs `fetch`.
///
/// A fetched `Some(value)` is written back with `max_age` only when
/// `cacheable(&value)` holds; it is returned either way. `None` is never
/// cached.
///
/// # Examples
///
/// ```rust,ignore
/// let tx = fetch_cached(
///     pools.tx.as_ref(),
///     &CacheKey::RawTransaction(txid.to_string()),
///     Duration::from_secs(3600),
///     || rpc.get_raw_transaction(txid),
///     should_cache_transaction,
/// )
/// .await?;
/// ```
pub async fn fetch_cached<T, E, F, Fut, P>(
    cache: &dyn CacheBackend,
    key: &CacheKey,
    max_age: Duration,
    fetch: F,
    cacheable: P,
) -> Result<Option<T>, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    P: FnOnce(&T) -> bool,
{
    if let Some(hit) = lookup(cache, key).await {
        return Ok(Some(hit));
    }

    let fetched = fetch().await?;
    match &fetched {
        Some(value) if cacheable(value) => store(cache, key, value, max_age).await,
        Some(_) => debug!(key = %key, "Fetched value not cacheable"),
        None => {}
    }

    Ok(fetched)
}

/// [`fetch_cached`] for fetches that always produce a value; the result is
/// always cacheable.
pub async fn fetch_required<T, E, F, Fut>(
    cache: &dyn CacheBackend,
    key: &CacheKey,
    max_age: Duration,
    fetch: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(hit) = lookup(cache, key).await {
        return Ok(hit);
    }

    let fetched = fetch().await?;
    store(cache, key, &fetched, max_age).await;
    Ok(fetched)
}

/// Whether a transaction may be written to the transaction pool.
///
/// Only confirmed transactions with at most
/// [`MAX_CACHEABLE_TX_INPUTS`] inputs qualify.
pub fn should_cache_transaction(tx: &Transaction) -> bool {
    tx.confirmations.is_some_and(|confirmations| confirmations >= 1)
        && tx.vin.len() <= MAX_CACHEABLE_TX_INPUTS
}

async fn lookup<T: DeserializeOwned>(cache: &dyn CacheBackend, key: &CacheKey) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(Value::Null)) | Ok(None) => None,
        Ok(Some(raw)) => match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %key, cache = cache.name(), error = %error, "Undecodable cache entry; treating as miss");
                None
            }
        },
        Err(error) => {
            warn!(key = %key, cache = cache.name(), error = %error, "Cache lookup failed; treating as miss");
            None
        }
    }
}

async fn store<T: Serialize>(cache: &dyn CacheBackend, key: &CacheKey, value: &T, max_age: Duration) {
    let raw = match serde_json::to_value(value) {
        Ok(raw) => raw,
        Err(error) => {
            warn!(key = %key, error = %error, "Failed to encode value for cache");
            return;
        }
    };

    if let Err(error) = cache.set(key, raw, max_age).await {
        warn!(key = %key, cache = cache.name(), error = %error, "Cache write failed");
    }
}
