// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache keys for node RPC results.

use std::fmt;

/// Identifies one logical RPC result.
///
/// The rendered string is an operation tag plus the distinguishing
/// parameters, so equal keys always render identically and different
/// lookups never collide. The strings are shared with external caches and
/// must stay stable.
///
/// # Examples
///
/// ```
/// use explorer_core::cache::CacheKey;
///
/// assert_eq!(CacheKey::BlockByHeight(5).to_string(), "getBlockByHeight-5");
/// assert_eq!(CacheKey::Utxo("ab".into(), 1).to_string(), "utxo-ab-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    BlockchainInfo,
    NetworkInfo,
    NetTotals,
    MempoolInfo,
    MiningInfo,
    UptimeSeconds,
    PeerInfo,
    /// `getchaintxstats` for a window of N blocks
    ChainTxStats(u64),
    RawMempool,
    MempoolTxids,
    MempoolTxDetails(String),
    BlockByHeight(u64),
    BlockByHash(String),
    RawTransaction(String),
    /// Output `n` of transaction `txid`
    Utxo(String, u32),
    Address(String),
    Help,
    MethodHelp(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::BlockchainInfo => f.write_str("getBlockchainInfo"),
            CacheKey::NetworkInfo => f.write_str("getNetworkInfo"),
            CacheKey::NetTotals => f.write_str("getNetTotals"),
            CacheKey::MempoolInfo => f.write_str("getMempoolInfo"),
            CacheKey::MiningInfo => f.write_str("getMiningInfo"),
            CacheKey::UptimeSeconds => f.write_str("getUptimeSeconds"),
            CacheKey::PeerInfo => f.write_str("getpeerinfo"),
            CacheKey::ChainTxStats(block_count) => write!(f, "getChainTxStats-{block_count}"),
            CacheKey::RawMempool => f.write_str("getRawMempool"),
            CacheKey::MempoolTxids => f.write_str("getMempoolTxids"),
            CacheKey::MempoolTxDetails(txid) => write!(f, "mempoolTxDetails-{txid}"),
            CacheKey::BlockByHeight(height) => write!(f, "getBlockByHeight-{height}"),
            CacheKey::BlockByHash(hash) => write!(f, "getBlockByHash-{hash}"),
            CacheKey::RawTransaction(txid) => write!(f, "getRawTransaction-{txid}"),
            CacheKey::Utxo(txid, n) => write!(f, "utxo-{txid}-{n}"),
            CacheKey::Address(address) => write!(f, "getAddress-{address}"),
            CacheKey::Help => f.write_str("getHelp"),
            CacheKey::MethodHelp(method) => write!(f, "getHelp-{method}"),
        }
    }
}
