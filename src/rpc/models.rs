// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Node record shapes.
//!
//! Only the fields the aggregation layer reads are typed. Everything else the
//! node returns is preserved in an `extra` map so records survive a cache
//! round-trip and reach the view layer unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque node payloads passed straight through to callers.
pub type NetworkInfo = Value;
/// `getnettotals` result.
pub type NetTotals = Value;
/// `getmempoolinfo` result.
pub type MempoolInfo = Value;
/// `getmininginfo` result.
pub type MiningInfo = Value;
/// `validateaddress` result.
pub type AddressInfo = Value;

/// Verbose `getrawmempool` result keyed by txid.
pub type RawMempool = HashMap<String, MempoolEntry>;

/// `getblockchaininfo` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockchainInfo {
    /// Network name (`main`, `test`, `regtest`)
    #[serde(default)]
    pub chain: String,
    /// Height of the active chain tip
    pub blocks: u64,
    #[serde(default)]
    pub headers: Option<u64>,
    #[serde(default)]
    pub bestblockhash: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getblock` result (verbosity 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub hash: String,
    pub height: u64,
    /// Transaction ids in block order; `tx[0]` is the coinbase
    #[serde(default)]
    pub tx: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    /// Consensus mechanism that produced the block, for hybrid PoW/PoS coins
    #[serde(default)]
    pub proof_type: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Coinbase transaction id, if the block lists any transactions.
    pub fn coinbase_txid(&self) -> Option<&str> {
        self.tx.first().map(String::as_str)
    }
}

/// `getrawtransaction` result (verbose).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub txid: String,
    /// Absent while the transaction is unconfirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub vin: Vec<TxInput>,
    #[serde(default)]
    pub vout: Vec<TxOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockhash: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Whether this is a coinbase transaction.
    pub fn is_coinbase(&self) -> bool {
        self.vin.first().is_some_and(|input| input.coinbase.is_some())
    }

    /// Sum of all output values that carry a plain amount.
    pub fn total_output_value(&self) -> f64 {
        self.vout.iter().filter_map(|out| out.value).sum()
    }
}

/// A transaction input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TxInput {
    /// Previous transaction id; absent for coinbase and some private inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    /// Previous output index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    /// Coinbase script (hex), present only on a coinbase input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A transaction output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TxOutput {
    /// Amount in whole coins; absent for confidential outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub n: u32,
    #[serde(
        rename = "scriptPubKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub script_pub_key: Option<ScriptPubKey>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Output locking script summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScriptPubKey {
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScriptPubKey {
    /// Every address the script pays to, across old and new node field layouts.
    pub fn all_addresses(&self) -> impl Iterator<Item = &str> {
        self.address
            .iter()
            .map(String::as_str)
            .chain(self.addresses.iter().map(String::as_str))
    }
}

/// `gettxout` result for an unspent output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxOut {
    #[serde(default)]
    pub bestblock: Option<String>,
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub coinbase: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-transaction mempool metadata from verbose `getrawmempool`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MempoolEntry {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub vsize: Option<u64>,
    /// Fee including prioritisation deltas (older node layout)
    #[serde(default)]
    pub modifiedfee: Option<f64>,
    #[serde(default)]
    pub fee: Option<f64>,
    /// Fee breakdown (newer node layout)
    #[serde(default)]
    pub fees: Option<MempoolFees>,
    /// Entry time, unix seconds
    #[serde(default)]
    pub time: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MempoolEntry {
    /// Modified fee in whole coins, whichever layout the node used.
    pub fn modified_fee(&self) -> f64 {
        self.modifiedfee
            .or_else(|| self.fees.as_ref().map(|fees| fees.modified))
            .or(self.fee)
            .unwrap_or(0.0)
    }

    /// Virtual size when the node reports it, else raw size.
    pub fn effective_size(&self) -> u64 {
        self.vsize.or(self.size).unwrap_or(0)
    }
}

/// The `fees` object of a mempool entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MempoolFees {
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub modified: f64,
}

/// `getchaintxstats` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChainTxStats {
    #[serde(default)]
    pub time: i64,
    /// Total transactions in the chain up to the window end
    pub txcount: u64,
    #[serde(default)]
    pub window_final_block_hash: Option<String>,
    #[serde(default)]
    pub window_block_count: Option<u64>,
    #[serde(default)]
    pub window_tx_count: Option<u64>,
    #[serde(default)]
    pub window_interval: Option<i64>,
    #[serde(default)]
    pub txrate: Option<f64>,
}

/// One `getpeerinfo` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub addr: String,
    /// Advertised user agent, e.g. `/Veil:1.1.0/`
    #[serde(default)]
    pub subver: String,
    /// Advertised service flags as a hex string
    #[serde(default)]
    pub services: String,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
