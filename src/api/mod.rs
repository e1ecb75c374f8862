// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cached node access and the aggregations built on it
//!
//! [`CoreApi`] owns the node client, the three cache pools and the explorer
//! configuration. Every operation checks the relevant pool before calling the
//! node and writes cacheable results back.
//!
//! # Examples
//!
//! ```rust,ignore
//! use explorer_core::{CoreApi, ExplorerConfig};
//!
//! let api = CoreApi::from_config(ExplorerConfig::from_env()?).await?;
//!
//! let info = api.get_blockchain_info().await?;
//! let page = api.get_block_page(&info.bestblockhash.unwrap_or_default(), 0, 20).await?;
//! println!("{} transactions on the first page", page.transactions.len());
//! ```

mod aggregate;
mod block_stats;
mod help;
mod mempool;
mod miner;
mod peers;
mod tx_stats;

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use aggregate::{BlockPage, InputLimit, TransactionsWithInputs, TxInputsByTransaction};
pub use block_stats::{BlockTypeStats, ProofClass};
pub use help::{parse_help, parse_method_help, HelpArgument, HelpMethod, HelpSection, MethodHelp};
pub use mempool::{summarize_mempool, FeeBucket, MempoolPage, MempoolSummary, MempoolTxDetails};
pub use miner::{block_total_fees, identify_miner};
pub use peers::{summarize_peers, PeerSummary};
pub use tx_stats::{BlockRef, RatePoint, TxCountPoint, TxCountSeries, TxCountStats};

use crate::cache::{
    fetch_cached, fetch_required, should_cache_transaction, CacheKey, CachePoolStats, CachePools,
};
use crate::config::constants::max_age;
use crate::config::ExplorerConfig;
use crate::errors::ExplorerError;
use crate::rpc::{
    AddressInfo, Block, BlockchainInfo, ChainTxStats, JsonRpcClient, MempoolEntry, MempoolInfo,
    MiningInfo, NetTotals, NetworkInfo, NodeRpc, PeerInfo, RawMempool, Transaction, TxOut,
};

/// Cached UTXO lookup result.
///
/// A spent or unknown output is stored as the string `"0"` so that absence is
/// itself cacheable; pools treat a missing entry as "not yet known".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CachedUtxo {
    Unspent(TxOut),
    Spent(SpentMarker),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum SpentMarker {
    #[serde(rename = "0")]
    Sentinel,
}

impl From<Option<TxOut>> for CachedUtxo {
    fn from(out: Option<TxOut>) -> Self {
        match out {
            Some(out) => CachedUtxo::Unspent(out),
            None => CachedUtxo::Spent(SpentMarker::Sentinel),
        }
    }
}

impl From<CachedUtxo> for Option<TxOut> {
    fn from(cached: CachedUtxo) -> Self {
        match cached {
            CachedUtxo::Unspent(out) => Some(out),
            CachedUtxo::Spent(_) => None,
        }
    }
}

/// Explorer data-access context
///
/// Cheap to clone; clones share the node client and the cache pools.
pub struct CoreApi<R> {
    rpc: Arc<R>,
    pools: CachePools,
    config: ExplorerConfig,
}

impl<R> Clone for CoreApi<R> {
    fn clone(&self) -> Self {
        Self {
            rpc: Arc::clone(&self.rpc),
            pools: self.pools.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> std::fmt::Debug for CoreApi<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreApi")
            .field("pools", &self.pools)
            .field("network", &self.config.network)
            .finish_non_exhaustive()
    }
}

impl CoreApi<JsonRpcClient> {
    /// Builds the JSON-RPC client and selects cache pools from `config`.
    pub async fn from_config(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        let rpc = JsonRpcClient::from_config(&config.rpc)?;
        let pools = CachePools::select(&config.cache).await;
        Ok(Self::new(rpc, pools, config))
    }
}

impl<R: NodeRpc> CoreApi<R> {
    pub fn new(rpc: R, pools: CachePools, config: ExplorerConfig) -> Self {
        Self::with_shared_rpc(Arc::new(rpc), pools, config)
    }

    /// Same as [`new`](Self::new) for a client already shared elsewhere.
    pub fn with_shared_rpc(rpc: Arc<R>, pools: CachePools, config: ExplorerConfig) -> Self {
        Self { rpc, pools, config }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn pools(&self) -> &CachePools {
        &self.pools
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn genesis_block_hash(&self) -> &str {
        self.config.genesis_block_hash()
    }

    pub fn genesis_coinbase_txid(&self) -> &str {
        self.config.genesis_coinbase_txid()
    }

    pub async fn get_blockchain_info(&self) -> Result<BlockchainInfo, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::BlockchainInfo,
            max_age::BLOCKCHAIN_INFO,
            || self.rpc.get_blockchain_info(),
        )
        .await?)
    }

    pub async fn get_network_info(&self) -> Result<NetworkInfo, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::NetworkInfo,
            max_age::NETWORK_INFO,
            || self.rpc.get_network_info(),
        )
        .await?)
    }

    pub async fn get_net_totals(&self) -> Result<NetTotals, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::NetTotals,
            max_age::NET_TOTALS,
            || self.rpc.get_net_totals(),
        )
        .await?)
    }

    pub async fn get_mempool_info(&self) -> Result<MempoolInfo, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::MempoolInfo,
            max_age::MEMPOOL_INFO,
            || self.rpc.get_mempool_info(),
        )
        .await?)
    }

    pub async fn get_mining_info(&self) -> Result<MiningInfo, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::MiningInfo,
            max_age::MINING_INFO,
            || self.rpc.get_mining_info(),
        )
        .await?)
    }

    pub async fn get_uptime_seconds(&self) -> Result<u64, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::UptimeSeconds,
            max_age::UPTIME,
            || self.rpc.get_uptime_seconds(),
        )
        .await?)
    }

    pub async fn get_peer_info(&self) -> Result<Vec<PeerInfo>, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::PeerInfo,
            max_age::PEER_INFO,
            || self.rpc.get_peer_info(),
        )
        .await?)
    }

    /// `getchaintxstats` for a window of `block_count` blocks ending at the tip.
    pub async fn get_chain_tx_stats(&self, block_count: u64) -> Result<ChainTxStats, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::ChainTxStats(block_count),
            max_age::CHAIN_TX_STATS,
            || self.rpc.get_chain_tx_stats(block_count),
        )
        .await?)
    }

    pub async fn get_raw_mempool(&self) -> Result<RawMempool, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::RawMempool,
            max_age::RAW_MEMPOOL,
            || self.rpc.get_raw_mempool(),
        )
        .await?)
    }

    pub async fn get_mempool_txids(&self) -> Result<Vec<String>, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::MempoolTxids,
            max_age::MEMPOOL_TXIDS,
            || self.rpc.get_mempool_txids(),
        )
        .await?)
    }

    pub async fn get_mempool_entry(&self, txid: &str) -> Result<MempoolEntry, ExplorerError> {
        Ok(self.rpc.get_mempool_entry(txid).await?)
    }

    pub async fn get_block_by_height(&self, height: u64) -> Result<Block, ExplorerError> {
        Ok(fetch_required(
            self.pools.block.as_ref(),
            &CacheKey::BlockByHeight(height),
            max_age::BLOCK,
            || self.rpc.get_block_by_height(height),
        )
        .await?)
    }

    pub async fn get_block_by_hash(&self, hash: &str) -> Result<Block, ExplorerError> {
        Ok(fetch_required(
            self.pools.block.as_ref(),
            &CacheKey::BlockByHash(hash.to_string()),
            max_age::BLOCK,
            || self.rpc.get_block_by_hash(hash),
        )
        .await?)
    }

    /// Transaction by id; `Ok(None)` when the node does not know it.
    ///
    /// Only confirmed transactions with few inputs are cached.
    pub async fn get_raw_transaction(&self, txid: &str) -> Result<Option<Transaction>, ExplorerError> {
        Ok(fetch_cached(
            self.pools.tx.as_ref(),
            &CacheKey::RawTransaction(txid.to_string()),
            max_age::TRANSACTION,
            || self.rpc.get_raw_transaction(txid),
            should_cache_transaction,
        )
        .await?)
    }

    /// Unspent output `(txid, vout)`; `Ok(None)` once spent or if it never existed.
    ///
    /// Both outcomes are cached, so a second lookup never reaches the node.
    pub async fn get_utxo(&self, txid: &str, vout: u32) -> Result<Option<TxOut>, ExplorerError> {
        let cached: CachedUtxo = fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::Utxo(txid.to_string(), vout),
            max_age::UTXO,
            || async {
                self.rpc
                    .get_tx_out(txid, vout)
                    .await
                    .map(CachedUtxo::from)
            },
        )
        .await?;
        Ok(cached.into())
    }

    /// UTXO state of every output of `tx`, aligned to `tx.vout`.
    pub async fn get_tx_utxos(&self, tx: &Transaction) -> Result<Vec<Option<TxOut>>, ExplorerError> {
        let output_count = u32::try_from(tx.vout.len())
            .map_err(|_| ExplorerError::invalid_argument("too many outputs"))?;
        try_join_all((0..output_count).map(|vout| self.get_utxo(&tx.txid, vout))).await
    }

    /// `validateaddress` result for `address`.
    pub async fn get_address(&self, address: &str) -> Result<AddressInfo, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::Address(address.to_string()),
            max_age::ADDRESS,
            || self.rpc.get_address(address),
        )
        .await?)
    }

    /// Raw `help` text.
    pub async fn get_help_text(&self) -> Result<String, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::Help,
            max_age::HELP,
            || self.rpc.get_help(),
        )
        .await?)
    }

    /// Raw `help <method>` text.
    pub async fn get_rpc_method_help_text(&self, method: &str) -> Result<String, ExplorerError> {
        Ok(fetch_required(
            self.pools.misc.as_ref(),
            &CacheKey::MethodHelp(method.to_string()),
            max_age::HELP,
            || self.rpc.get_rpc_method_help(method),
        )
        .await?)
    }

    pub async fn cache_stats(&self) -> CachePoolStats {
        self.pools.stats().await
    }

    /// Emits per-pool cache statistics at `info`.
    pub async fn log_cache_sizes(&self) {
        let stats = self.cache_stats().await;
        info!(pool = "misc", cache = self.pools.misc.name(), "{}", stats.misc);
        info!(pool = "block", cache = self.pools.block.name(), "{}", stats.block);
        info!(pool = "tx", cache = self.pools.tx.name(), "{}", stats.tx);
    }
}
