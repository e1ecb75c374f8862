// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC client for bitcoind-derived full nodes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::{Layer, ServiceExt};

use super::{
    AddressInfo, Block, BlockchainInfo, ChainTxStats, MempoolEntry, MempoolInfo, MiningInfo,
    NetTotals, NetworkInfo, NodeRpc, PeerInfo, RawMempool, RpcCredentials, Transaction, TxOut,
};
use crate::config::RpcConfig;
use crate::errors::{ExplorerError, RpcError};
use crate::transport::{
    HttpTransport, LoggingLayer, LoggingService, RetryLayer, RetryService, RpcRequest,
};

type ClientService = LoggingService<RetryService<HttpTransport>>;

/// [`NodeRpc`] over HTTP.
///
/// Requests flow through `LoggingLayer -> RetryLayer -> HttpTransport`. Each
/// call clones the service stack, so the client can be shared freely.
///
/// # Examples
///
/// ```rust,ignore
/// use explorer_core::{ExplorerConfig, JsonRpcClient, NodeRpc};
///
/// let config = ExplorerConfig::from_env()?;
/// let client = JsonRpcClient::from_config(&config.rpc)?;
/// let info = client.get_blockchain_info().await?;
/// println!("tip at {}", info.blocks);
/// ```
#[derive(Clone, Debug)]
pub struct JsonRpcClient {
    service: ClientService,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    /// Builds the client, resolving credentials from the config or cookie file.
    pub fn from_config(config: &RpcConfig) -> Result<Self, ExplorerError> {
        let url = config.endpoint()?;
        let auth = RpcCredentials::resolve(config)?.map(Into::into);
        let transport = HttpTransport::new(url, auth, config.timeout)
            .map_err(|e| ExplorerError::config(format!("building HTTP client: {e}")))?;

        let retry = RetryLayer::from_config(config.retry.clone());
        let logging = LoggingLayer::new().with_slow_call_threshold(config.timeout / 2);
        Ok(Self {
            service: logging.layer(retry.layer(transport)),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Issues one call and decodes its `result`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let result = self
            .service
            .clone()
            .oneshot(RpcRequest::new(id, method, params))
            .await?;
        serde_json::from_value(result).map_err(|e| RpcError::decode(method, e))
    }
}

#[async_trait]
impl NodeRpc for JsonRpcClient {
    async fn get_blockchain_info(&self) -> Result<BlockchainInfo, RpcError> {
        self.call("getblockchaininfo", vec![]).await
    }

    async fn get_network_info(&self) -> Result<NetworkInfo, RpcError> {
        self.call("getnetworkinfo", vec![]).await
    }

    async fn get_net_totals(&self) -> Result<NetTotals, RpcError> {
        self.call("getnettotals", vec![]).await
    }

    async fn get_mempool_info(&self) -> Result<MempoolInfo, RpcError> {
        self.call("getmempoolinfo", vec![]).await
    }

    async fn get_mining_info(&self) -> Result<MiningInfo, RpcError> {
        self.call("getmininginfo", vec![]).await
    }

    async fn get_uptime_seconds(&self) -> Result<u64, RpcError> {
        self.call("uptime", vec![]).await
    }

    async fn get_peer_info(&self) -> Result<Vec<PeerInfo>, RpcError> {
        self.call("getpeerinfo", vec![]).await
    }

    async fn get_chain_tx_stats(&self, block_count: u64) -> Result<ChainTxStats, RpcError> {
        self.call("getchaintxstats", vec![json!(block_count)]).await
    }

    async fn get_raw_mempool(&self) -> Result<RawMempool, RpcError> {
        self.call("getrawmempool", vec![json!(true)]).await
    }

    async fn get_mempool_txids(&self) -> Result<Vec<String>, RpcError> {
        self.call("getrawmempool", vec![json!(false)]).await
    }

    async fn get_block_by_height(&self, height: u64) -> Result<Block, RpcError> {
        let hash: String = self.call("getblockhash", vec![json!(height)]).await?;
        self.get_block_by_hash(&hash).await
    }

    async fn get_block_by_hash(&self, hash: &str) -> Result<Block, RpcError> {
        self.call("getblock", vec![json!(hash)]).await
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<Option<Transaction>, RpcError> {
        match self
            .call("getrawtransaction", vec![json!(txid), json!(1)])
            .await
        {
            Ok(tx) => Ok(Some(tx)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_tx_out(&self, txid: &str, vout: u32) -> Result<Option<TxOut>, RpcError> {
        self.call("gettxout", vec![json!(txid), json!(vout)]).await
    }

    async fn get_mempool_entry(&self, txid: &str) -> Result<MempoolEntry, RpcError> {
        self.call("getmempoolentry", vec![json!(txid)]).await
    }

    async fn get_address(&self, address: &str) -> Result<AddressInfo, RpcError> {
        self.call("validateaddress", vec![json!(address)]).await
    }

    async fn get_help(&self) -> Result<String, RpcError> {
        self.call("help", vec![]).await
    }

    async fn get_rpc_method_help(&self, method: &str) -> Result<String, RpcError> {
        self.call("help", vec![json!(method)]).await
    }
}
