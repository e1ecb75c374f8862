// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Freshness windows, pool capacities and other fixed numbers
//!
//! Centralized here so the caching behavior of every fetch wrapper can be read
//! in one place.

use std::time::Duration;

/// Cache freshness windows per RPC result
pub mod max_age {
    use super::Duration;

    pub const BLOCKCHAIN_INFO: Duration = Duration::from_secs(10);
    pub const NETWORK_INFO: Duration = Duration::from_secs(10);
    pub const NET_TOTALS: Duration = Duration::from_secs(10);
    pub const MEMPOOL_INFO: Duration = Duration::from_secs(1);
    pub const MINING_INFO: Duration = Duration::from_secs(30);
    pub const UPTIME: Duration = Duration::from_secs(1);
    /// 20 minutes
    pub const CHAIN_TX_STATS: Duration = Duration::from_secs(1_200);
    pub const PEER_INFO: Duration = Duration::from_secs(1);
    pub const RAW_MEMPOOL: Duration = Duration::from_secs(5);
    pub const MEMPOOL_TXIDS: Duration = Duration::from_secs(1);
    pub const BLOCK: Duration = Duration::from_secs(3_600);
    pub const TRANSACTION: Duration = Duration::from_secs(3_600);
    pub const UTXO: Duration = Duration::from_secs(3_600);
    pub const MEMPOOL_TX_DETAILS: Duration = Duration::from_secs(3_600);
    pub const ADDRESS: Duration = Duration::from_secs(3_600);
    pub const HELP: Duration = Duration::from_secs(3_600);
}

/// Default capacity of the miscellaneous in-memory pool
pub const DEFAULT_MISC_CACHE_CAPACITY: usize = 50;
/// Default capacity of the block in-memory pool
pub const DEFAULT_BLOCK_CACHE_CAPACITY: usize = 50;
/// Default capacity of the transaction in-memory pool
pub const DEFAULT_TX_CACHE_CAPACITY: usize = 200;

/// Transactions with more inputs than this are never cached
pub const MAX_CACHEABLE_TX_INPUTS: usize = 9;

/// Leading inputs resolved per transaction unless the caller overrides it
pub const DEFAULT_MAX_INPUTS_TRACKED: usize = 15;

/// Narrowest `getchaintxstats` window sampled for rate series
pub const MIN_CHAIN_TX_STATS_WINDOW: u64 = 10;

/// Number of equal-width age and size buckets in the mempool summary
pub const MEMPOOL_HISTOGRAM_BUCKETS: usize = 100;

/// Satoshis per whole coin
pub const SATOSHIS_PER_COIN: f64 = 100_000_000.0;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 58812;
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_REDIS_PREFIX: &str = "veilexp:";
