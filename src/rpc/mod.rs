// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The full-node RPC collaborator.
//!
//! [`NodeRpc`] is the seam between the aggregation layer and the node: one
//! async method per node RPC the explorer needs. [`JsonRpcClient`] is the
//! production implementation; tests supply scripted doubles.

mod client;
mod credentials;
pub mod models;

use async_trait::async_trait;

pub use client::JsonRpcClient;
pub use credentials::RpcCredentials;
pub use models::*;

use crate::errors::RpcError;

/// Async access to a full node.
///
/// Implementations reject with [`RpcError`] on transport or node failure and
/// resolve with the method's native result otherwise. Lookups of objects that
/// may legitimately not exist resolve `Ok(None)` instead of failing.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError>;

    async fn get_network_info(&self) -> Result<NetworkInfo, RpcError>;

    async fn get_net_totals(&self) -> Result<NetTotals, RpcError>;

    async fn get_mempool_info(&self) -> Result<MempoolInfo, RpcError>;

    async fn get_mining_info(&self) -> Result<MiningInfo, RpcError>;

    async fn get_uptime_seconds(&self) -> Result<u64, RpcError>;

    async fn get_peer_info(&self) -> Result<Vec<PeerInfo>, RpcError>;

    /// `getchaintxstats` over a window of `block_count` blocks ending at the tip.
    async fn get_chain_tx_stats(&self, block_count: u64) -> Result<ChainTxStats, RpcError>;

    /// Verbose mempool snapshot keyed by txid.
    async fn get_raw_mempool(&self) -> Result<RawMempool, RpcError>;

    /// Mempool transaction ids in node order.
    async fn get_mempool_txids(&self) -> Result<Vec<String>, RpcError>;

    async fn get_block_by_height(&self, height: u64) -> Result<Block, RpcError>;

    async fn get_block_by_hash(&self, hash: &str) -> Result<Block, RpcError>;

    /// `Ok(None)` when the node does not know the transaction.
    async fn get_raw_transaction(&self, txid: &str) -> Result<Option<Transaction>, RpcError>;

    /// `Ok(None)` when the output is spent or never existed.
    async fn get_tx_out(&self, txid: &str, vout: u32) -> Result<Option<TxOut>, RpcError>;

    async fn get_mempool_entry(&self, txid: &str) -> Result<MempoolEntry, RpcError>;

    async fn get_address(&self, address: &str) -> Result<AddressInfo, RpcError>;

    /// Full `help` output.
    async fn get_help(&self) -> Result<String, RpcError>;

    /// `help <method>` output.
    async fn get_rpc_method_help(&self, method: &str) -> Result<String, RpcError>;
}
