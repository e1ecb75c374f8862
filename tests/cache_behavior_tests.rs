// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-or-fetch behavior of the cached node wrappers
//!
//! These tests count node calls behind [`CoreApi`] to verify what is served
//! from the pools, what is never written to them, and that a failing cache
//! backend degrades to plain node access.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use explorer_core::cache::{CacheBackend, CacheKey, CacheStats};
use explorer_core::{CacheError, CachePools, CoreApi, ExplorerConfig, ExplorerError};
use helpers::{block, confirmed_tx, memory_api, uncached_api, unconfirmed_tx, MockNode};

/// Backend that fails every operation
struct UnreachableCache;

#[async_trait]
impl CacheBackend for UnreachableCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Err(CacheError::backend("UnreachableCache", "connection refused", None))
    }

    async fn set(&self, _key: &CacheKey, _value: Value, _max_age: Duration) -> Result<(), CacheError> {
        Err(CacheError::backend("UnreachableCache", "connection refused", None))
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "UnreachableCache"
    }
}

fn inputs(count: usize) -> Vec<(String, u32)> {
    (0..count).map(|i| (format!("prev{i}"), 0)).collect()
}

fn tx_with_inputs(txid: &str, confirmations: u64, count: usize) -> explorer_core::rpc::Transaction {
    let owned = inputs(count);
    let borrowed: Vec<(&str, u32)> = owned.iter().map(|(id, n)| (id.as_str(), *n)).collect();
    confirmed_tx(txid, confirmations, &borrowed)
}

#[tokio::test]
async fn test_warm_cache_serves_repeat_requests() {
    let api = memory_api(MockNode::new(120).with_block(block(7, &["cb7"])));

    let first = api.get_blockchain_info().await.unwrap();
    let second = api.get_blockchain_info().await.unwrap();
    assert_eq!(first, second, "Cached value should equal the fetched value");
    assert_eq!(
        api.rpc().calls("getblockchaininfo"),
        1,
        "Second request should be served from the misc pool"
    );

    let block_a = api.get_block_by_height(7).await.unwrap();
    let block_b = api.get_block_by_height(7).await.unwrap();
    assert_eq!(block_a, block_b);
    assert_eq!(api.rpc().calls("getblock"), 1);
}

#[tokio::test]
async fn test_chain_tx_stats_keyed_by_window() {
    let api = memory_api(MockNode::new(500));

    api.get_chain_tx_stats(10).await.unwrap();
    api.get_chain_tx_stats(20).await.unwrap();
    api.get_chain_tx_stats(10).await.unwrap();

    assert_eq!(
        api.rpc().calls("getchaintxstats"),
        2,
        "Each distinct window should reach the node exactly once"
    );
}

#[tokio::test]
async fn test_disabled_pools_always_reach_node() {
    let api = uncached_api(MockNode::new(120));

    api.get_uptime_seconds().await.unwrap();
    api.get_uptime_seconds().await.unwrap();

    assert_eq!(api.rpc().calls("uptime"), 2);
}

#[tokio::test]
async fn test_confirmed_transaction_is_cached() {
    let api = memory_api(MockNode::new(120).with_transaction(tx_with_inputs("nine", 1, 9)));

    assert!(api.get_raw_transaction("nine").await.unwrap().is_some());
    assert!(api.get_raw_transaction("nine").await.unwrap().is_some());

    assert_eq!(
        api.rpc().calls("getrawtransaction"),
        1,
        "A confirmed transaction with 9 inputs should be cached"
    );
}

#[tokio::test]
async fn test_transaction_with_many_inputs_is_not_cached() {
    let api = memory_api(MockNode::new(120).with_transaction(tx_with_inputs("ten", 1, 10)));

    api.get_raw_transaction("ten").await.unwrap();
    api.get_raw_transaction("ten").await.unwrap();

    assert_eq!(
        api.rpc().calls("getrawtransaction"),
        2,
        "A transaction with 10 inputs should never be written to the tx pool"
    );
}

#[tokio::test]
async fn test_unconfirmed_transaction_is_not_cached() {
    let api = memory_api(
        MockNode::new(120)
            .with_transaction(unconfirmed_tx("pending", &[("prev", 0)]))
            .with_transaction(tx_with_inputs("zero-conf", 0, 1)),
    );

    for _ in 0..2 {
        api.get_raw_transaction("pending").await.unwrap();
        api.get_raw_transaction("zero-conf").await.unwrap();
    }

    assert_eq!(api.rpc().calls("getrawtransaction"), 4);
}

#[tokio::test]
async fn test_unknown_transaction_is_none_and_not_cached() {
    let api = memory_api(MockNode::new(120));

    assert!(api.get_raw_transaction("missing").await.unwrap().is_none());
    assert!(api.get_raw_transaction("missing").await.unwrap().is_none());
    assert_eq!(api.rpc().calls("getrawtransaction"), 2);
}

#[tokio::test]
async fn test_spent_output_is_cached_as_absent() {
    let api = memory_api(MockNode::new(120));

    assert_eq!(api.get_utxo("spent", 0).await.unwrap(), None);
    assert_eq!(
        api.get_utxo("spent", 0).await.unwrap(),
        None,
        "Cached spent marker should decode back to None"
    );
    assert_eq!(
        api.rpc().calls("gettxout"),
        1,
        "A spent output should be remembered as spent"
    );
}

#[tokio::test]
async fn test_tx_utxos_follow_output_order() {
    let mut tx = confirmed_tx("funding", 3, &[]);
    let mut second = tx.vout[0].clone();
    second.n = 1;
    tx.vout.push(second);

    let api = memory_api(MockNode::new(120).with_utxo("funding", 1, 2.5));

    let utxos = api.get_tx_utxos(&tx).await.unwrap();
    assert_eq!(utxos.len(), 2);
    assert!(utxos[0].is_none(), "Output 0 is spent");
    assert_eq!(utxos[1].as_ref().and_then(|out| out.value), Some(2.5));
}

#[tokio::test]
async fn test_fetch_errors_propagate_and_are_not_cached() {
    let api = memory_api(MockNode::new(120).failing("getpeerinfo"));

    let first = api.get_peer_info().await;
    let second = api.get_peer_info().await;

    match first {
        Err(ExplorerError::Rpc(error)) => assert_eq!(error.method(), "getpeerinfo"),
        other => panic!("Expected an RPC error, got {other:?}"),
    }
    assert!(second.is_err());
    assert_eq!(
        api.rpc().calls("getpeerinfo"),
        2,
        "Failures must not be cached"
    );
}

#[tokio::test]
async fn test_unreachable_cache_falls_back_to_node() {
    let pools = CachePools::shared(Arc::new(UnreachableCache));
    let api = CoreApi::new(
        MockNode::new(120).with_block(block(3, &["cb3"])),
        pools,
        ExplorerConfig::default(),
    );

    let info = api.get_blockchain_info().await.unwrap();
    assert_eq!(info.blocks, 120);
    let block = api.get_block_by_height(3).await.unwrap();
    assert_eq!(block.height, 3);

    api.get_blockchain_info().await.unwrap();
    assert_eq!(
        api.rpc().calls("getblockchaininfo"),
        2,
        "Every request should reach the node while the cache is down"
    );
}

#[tokio::test]
async fn test_clones_share_pools() {
    let api = memory_api(MockNode::new(120));
    let clone = api.clone();

    api.get_mining_info().await.unwrap();
    clone.get_mining_info().await.unwrap();

    assert_eq!(api.rpc().calls("getmininginfo"), 1);

    let stats = api.cache_stats().await;
    assert_eq!(stats.misc.hits, 1);
    assert_eq!(stats.misc.misses, 1);
}
