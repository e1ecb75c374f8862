// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for explorer-core integration tests
//!
//! Provides a scripted node so aggregations can be exercised without a real
//! full node.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use explorer_core::rpc::{
    AddressInfo, Block, BlockchainInfo, ChainTxStats, MempoolEntry, MempoolInfo, MiningInfo,
    NetTotals, NetworkInfo, PeerInfo, RawMempool, Transaction, TxOut,
};
use explorer_core::{CachePools, CoreApi, ExplorerConfig, NodeRpc, RpcError};

/// Transactions per block in the synthetic `getchaintxstats` answers
pub const TXS_PER_BLOCK: u64 = 3;

/// Scripted [`NodeRpc`] with per-method call counters
///
/// # Example
///
/// ```rust,ignore
/// let node = MockNode::new(100)
///     .with_block(block(5, &["cb5"]))
///     .with_transaction(confirmed_tx("cb5", 1, &[]));
///
/// let api = memory_api(node);
/// api.get_block_by_height(5).await?;
/// assert_eq!(api.rpc().calls("getblock"), 1);
/// ```
#[derive(Default)]
pub struct MockNode {
    tip: u64,
    blocks: HashMap<u64, Block>,
    transactions: HashMap<String, Transaction>,
    utxos: HashMap<(String, u32), TxOut>,
    mempool: RawMempool,
    mempool_txids: Vec<String>,
    peers: Vec<PeerInfo>,
    help: String,
    method_help: HashMap<String, String>,
    block_delays: HashMap<u64, Duration>,
    failing: HashSet<&'static str>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockNode {
    pub fn new(tip: u64) -> Self {
        Self {
            tip,
            ..Self::default()
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.insert(block.height, block);
        self
    }

    /// Blocks at every height in `heights` with a single coinbase each.
    pub fn with_blocks(mut self, heights: impl IntoIterator<Item = u64>) -> Self {
        for height in heights {
            let coinbase = format!("cb{height}");
            self.blocks.insert(height, block(height, &[coinbase.as_str()]));
        }
        self
    }

    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.insert(tx.txid.clone(), tx);
        self
    }

    pub fn with_utxo(mut self, txid: &str, vout: u32, value: f64) -> Self {
        let out = serde_json::from_value(json!({
            "bestblock": "00",
            "confirmations": 6,
            "value": value,
            "coinbase": false
        }))
        .unwrap();
        self.utxos.insert((txid.to_string(), vout), out);
        self
    }

    /// Adds a mempool entry; the txid is also listed by `getrawmempool false`.
    pub fn with_mempool_entry(mut self, txid: &str, entry: MempoolEntry) -> Self {
        self.mempool.insert(txid.to_string(), entry);
        self.mempool_txids.push(txid.to_string());
        self
    }

    pub fn with_peer(mut self, subver: &str, services: &str) -> Self {
        self.peers.push(
            serde_json::from_value(json!({
                "id": self.peers.len(),
                "addr": "10.0.0.1:58810",
                "subver": subver,
                "services": services
            }))
            .unwrap(),
        );
        self
    }

    pub fn with_help(mut self, text: &str) -> Self {
        self.help = text.to_string();
        self
    }

    pub fn with_method_help(mut self, method: &str, text: &str) -> Self {
        self.method_help.insert(method.to_string(), text.to_string());
        self
    }

    /// Delays the answer for the block at `height`.
    pub fn with_block_delay(mut self, height: u64, delay: Duration) -> Self {
        self.block_delays.insert(height, delay);
        self
    }

    /// Every call to `method` fails with a node error.
    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    /// Number of times `method` reached the node.
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, method: &'static str) -> Result<(), RpcError> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        if self.failing.contains(method) {
            return Err(RpcError::node(method, -1, "scripted failure"));
        }
        Ok(())
    }

    fn block_at(&self, height: u64) -> Result<Block, RpcError> {
        self.blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| RpcError::node("getblockhash", -8, "Block height out of range"))
    }
}

#[async_trait]
impl NodeRpc for MockNode {
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError> {
        self.record("getblockchaininfo")?;
        Ok(serde_json::from_value(json!({"chain": "main", "blocks": self.tip})).unwrap())
    }

    async fn get_network_info(&self) -> Result<NetworkInfo, RpcError> {
        self.record("getnetworkinfo")?;
        Ok(json!({"version": 1010000, "subversion": "/Veil:1.1.0/"}))
    }

    async fn get_net_totals(&self) -> Result<NetTotals, RpcError> {
        self.record("getnettotals")?;
        Ok(json!({"totalbytesrecv": 10, "totalbytessent": 20}))
    }

    async fn get_mempool_info(&self) -> Result<MempoolInfo, RpcError> {
        self.record("getmempoolinfo")?;
        Ok(json!({"size": self.mempool.len()}))
    }

    async fn get_mining_info(&self) -> Result<MiningInfo, RpcError> {
        self.record("getmininginfo")?;
        Ok(json!({"blocks": self.tip}))
    }

    async fn get_uptime_seconds(&self) -> Result<u64, RpcError> {
        self.record("uptime")?;
        Ok(3_600)
    }

    async fn get_peer_info(&self) -> Result<Vec<PeerInfo>, RpcError> {
        self.record("getpeerinfo")?;
        Ok(self.peers.clone())
    }

    async fn get_chain_tx_stats(&self, block_count: u64) -> Result<ChainTxStats, RpcError> {
        self.record("getchaintxstats")?;
        Ok(ChainTxStats {
            time: 0,
            txcount: self.tip * TXS_PER_BLOCK,
            window_final_block_hash: None,
            window_block_count: Some(block_count),
            window_tx_count: Some(block_count * TXS_PER_BLOCK),
            window_interval: Some(block_count as i64 * 60),
            txrate: Some(TXS_PER_BLOCK as f64 / 60.0),
        })
    }

    async fn get_raw_mempool(&self) -> Result<RawMempool, RpcError> {
        self.record("getrawmempool")?;
        Ok(self.mempool.clone())
    }

    async fn get_mempool_txids(&self) -> Result<Vec<String>, RpcError> {
        self.record("getrawmempool")?;
        Ok(self.mempool_txids.clone())
    }

    async fn get_block_by_height(&self, height: u64) -> Result<Block, RpcError> {
        self.record("getblock")?;
        if let Some(delay) = self.block_delays.get(&height) {
            tokio::time::sleep(*delay).await;
        }
        self.block_at(height)
    }

    async fn get_block_by_hash(&self, hash: &str) -> Result<Block, RpcError> {
        self.record("getblock")?;
        self.blocks
            .values()
            .find(|block| block.hash == hash)
            .cloned()
            .ok_or_else(|| RpcError::node("getblock", -5, "Block not found"))
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<Option<Transaction>, RpcError> {
        self.record("getrawtransaction")?;
        Ok(self.transactions.get(txid).cloned())
    }

    async fn get_tx_out(&self, txid: &str, vout: u32) -> Result<Option<TxOut>, RpcError> {
        self.record("gettxout")?;
        Ok(self.utxos.get(&(txid.to_string(), vout)).cloned())
    }

    async fn get_mempool_entry(&self, txid: &str) -> Result<MempoolEntry, RpcError> {
        self.record("getmempoolentry")?;
        self.mempool
            .get(txid)
            .cloned()
            .ok_or_else(|| RpcError::node("getmempoolentry", -5, "Transaction not in mempool"))
    }

    async fn get_address(&self, address: &str) -> Result<AddressInfo, RpcError> {
        self.record("validateaddress")?;
        Ok(json!({"isvalid": address.starts_with('V'), "address": address}))
    }

    async fn get_help(&self) -> Result<String, RpcError> {
        self.record("help")?;
        Ok(self.help.clone())
    }

    async fn get_rpc_method_help(&self, method: &str) -> Result<String, RpcError> {
        self.record("help")?;
        self.method_help
            .get(method)
            .cloned()
            .ok_or_else(|| RpcError::node("help", -32601, "help: unknown command"))
    }
}

/// Block at `height` whose hash is derived from the height.
pub fn block(height: u64, txids: &[&str]) -> Block {
    serde_json::from_value(json!({
        "hash": block_hash(height),
        "height": height,
        "tx": txids,
        "difficulty": 1.5,
        "proof_type": "Proof-of-stake",
        "time": 1_600_000_000 + height as i64 * 60,
    }))
    .unwrap()
}

pub fn block_hash(height: u64) -> String {
    format!("{height:064x}")
}

/// Transaction spending `inputs` as `(previous txid, vout)` pairs.
pub fn confirmed_tx(txid: &str, confirmations: u64, inputs: &[(&str, u32)]) -> Transaction {
    transaction(txid, Some(confirmations), inputs)
}

pub fn unconfirmed_tx(txid: &str, inputs: &[(&str, u32)]) -> Transaction {
    transaction(txid, None, inputs)
}

fn transaction(txid: &str, confirmations: Option<u64>, inputs: &[(&str, u32)]) -> Transaction {
    let vin: Vec<Value> = inputs
        .iter()
        .map(|(prev, vout)| json!({"txid": prev, "vout": vout, "sequence": 4294967295u64}))
        .collect();
    let mut raw = json!({
        "txid": txid,
        "vin": vin,
        "vout": [{"value": 1.0, "n": 0, "scriptPubKey": {"addresses": ["Vdest"]}}],
    });
    if let Some(confirmations) = confirmations {
        raw["confirmations"] = json!(confirmations);
    }
    serde_json::from_value(raw).unwrap()
}

/// Coinbase transaction paying `value` coins.
pub fn coinbase_tx(txid: &str, value: f64) -> Transaction {
    serde_json::from_value(json!({
        "txid": txid,
        "confirmations": 10,
        "vin": [{"coinbase": "03a08601"}],
        "vout": [{"value": value, "n": 0, "scriptPubKey": {"addresses": ["Vminer"]}}],
    }))
    .unwrap()
}

pub fn mempool_entry(fee: f64, size: u64, time: i64) -> MempoolEntry {
    MempoolEntry {
        size: Some(size),
        modifiedfee: Some(fee),
        time,
        ..MempoolEntry::default()
    }
}

/// API over `node` with default in-memory pools.
pub fn memory_api(node: MockNode) -> CoreApi<MockNode> {
    let config = ExplorerConfig::default();
    let pools = CachePools::in_memory(
        config.cache.misc_capacity,
        config.cache.block_capacity,
        config.cache.tx_capacity,
    );
    CoreApi::new(node, pools, config)
}

/// API over `node` with caching disabled.
pub fn uncached_api(node: MockNode) -> CoreApi<MockNode> {
    CoreApi::new(node, CachePools::disabled(), ExplorerConfig::default())
}
