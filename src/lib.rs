// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-augmented node RPC access for a UTXO block explorer.
//!
//! [`CoreApi`] sits between request handlers and a full node. It serves node
//! results from one of three cache pools (misc, block, transaction) when it
//! can, and assembles composite views from concurrent node calls:
//!
//! - transactions with their spent inputs resolved
//! - a page of a block's transactions with fees and miner
//! - mempool pages and fee/age/size histograms
//! - chain transaction-rate series, peer summaries, proof-type shares
//! - parsed node `help` output
//!
//! The node is reached through the [`NodeRpc`] trait; [`JsonRpcClient`] is
//! the HTTP implementation.

pub mod api;
pub mod cache;
pub mod coins;
pub mod config;
pub mod errors;
pub mod rpc;
pub mod transport;

mod spans;

pub use api::{
    BlockPage, BlockRef, BlockTypeStats, CoreApi, HelpSection, InputLimit, MempoolPage,
    MempoolSummary, MempoolTxDetails, MethodHelp, PeerSummary, TransactionsWithInputs,
    TxCountStats, TxInputsByTransaction,
};
pub use cache::{CacheBackend, CacheKey, CachePoolStats, CachePools, CacheStats};
pub use coins::{CoinParams, MiningPool, Network};
pub use config::{CacheConfig, ExplorerConfig, ExplorerConfigBuilder, RpcConfig};
pub use errors::{CacheError, ExplorerError, RpcError};
pub use rpc::{JsonRpcClient, NodeRpc, RpcCredentials};
