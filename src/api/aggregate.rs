// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Batch fetches and transaction input resolution.
//!
//! Every batch issues its cached fetches concurrently and fails as a whole if
//! any single fetch fails. Results keep the order of the request.

use std::collections::{BTreeMap, HashMap, HashSet};

use bigdecimal::BigDecimal;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, Instrument};

use super::miner::{block_total_fees, identify_miner};
use super::CoreApi;
use crate::coins::MiningPool;
use crate::errors::ExplorerError;
use crate::rpc::{Block, NodeRpc, Transaction};
use crate::spans;

/// Resolved previous transactions, keyed by spending txid and then input position.
///
/// Only inputs that were within the tracked limit and whose previous
/// transaction the node returned are present.
pub type TxInputsByTransaction = HashMap<String, BTreeMap<usize, Transaction>>;

/// How many leading inputs of each transaction to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLimit {
    /// The configured `max_inputs_tracked`
    #[default]
    Configured,
    Unbounded,
    Leading(usize),
}

impl InputLimit {
    fn resolve(self, configured: usize) -> usize {
        match self {
            InputLimit::Configured => configured,
            InputLimit::Unbounded => usize::MAX,
            InputLimit::Leading(count) => count,
        }
    }
}

/// Zero or negative means unbounded.
impl From<i64> for InputLimit {
    fn from(value: i64) -> Self {
        match usize::try_from(value) {
            Ok(count) if count > 0 => InputLimit::Leading(count),
            _ => InputLimit::Unbounded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsWithInputs {
    pub transactions: Vec<Transaction>,
    pub tx_inputs_by_transaction: TxInputsByTransaction,
}

/// One page of a block's transactions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPage {
    #[serde(rename = "getblock")]
    pub block: Block,
    /// `None` only when the block lists no transactions or the page did not need it
    pub coinbase_tx: Option<Transaction>,
    /// Coinbase outputs minus the block subsidy, in whole coins
    pub total_fees: Option<BigDecimal>,
    pub miner: Option<MiningPool>,
    /// The requested window of `block.tx`, in block order
    pub transactions: Vec<Transaction>,
    pub tx_inputs_by_transaction: TxInputsByTransaction,
}

impl<R: NodeRpc> CoreApi<R> {
    /// Blocks at `heights`, aligned to the request.
    pub async fn get_blocks_by_height(&self, heights: &[u64]) -> Result<Vec<Block>, ExplorerError> {
        try_join_all(heights.iter().map(|&height| self.get_block_by_height(height)))
            .instrument(spans::get_blocks(heights.len()))
            .await
    }

    /// Blocks for `hashes`, keyed by block hash.
    pub async fn get_blocks_by_hash(
        &self,
        hashes: &[String],
    ) -> Result<HashMap<String, Block>, ExplorerError> {
        let blocks = try_join_all(hashes.iter().map(|hash| self.get_block_by_hash(hash)))
            .instrument(spans::get_blocks(hashes.len()))
            .await?;
        Ok(blocks
            .into_iter()
            .map(|block| (block.hash.clone(), block))
            .collect())
    }

    /// Transactions for `txids`, aligned to the request.
    ///
    /// Fails with [`ExplorerError::NotFound`] if the node does not know one of them.
    pub async fn get_raw_transactions(
        &self,
        txids: &[String],
    ) -> Result<Vec<Transaction>, ExplorerError> {
        let found = self.find_raw_transactions(txids).await?;
        txids
            .iter()
            .zip(found)
            .map(|(txid, tx)| tx.ok_or_else(|| ExplorerError::missing_transaction(txid)))
            .collect()
    }

    /// Like [`get_raw_transactions`](Self::get_raw_transactions) but unknown
    /// transactions come back as `None`.
    pub(crate) async fn find_raw_transactions(
        &self,
        txids: &[String],
    ) -> Result<Vec<Option<Transaction>>, ExplorerError> {
        try_join_all(txids.iter().map(|txid| self.get_raw_transaction(txid))).await
    }

    /// Transactions for `txids` with their leading inputs resolved.
    ///
    /// ```rust,ignore
    /// use explorer_core::InputLimit;
    ///
    /// let result = api
    ///     .get_raw_transactions_with_inputs(&[txid.clone()], InputLimit::from(-1))
    ///     .await?;
    /// for (position, previous) in &result.tx_inputs_by_transaction[&txid] {
    ///     println!("input {position} spends from {}", previous.txid);
    /// }
    /// ```
    pub async fn get_raw_transactions_with_inputs(
        &self,
        txids: &[String],
        limit: InputLimit,
    ) -> Result<TransactionsWithInputs, ExplorerError> {
        let span = spans::get_raw_transactions_with_inputs(txids.len());
        async move {
            let transactions = self.get_raw_transactions(txids).await?;
            let limit = limit.resolve(self.config.max_inputs_tracked);
            let tx_inputs_by_transaction = self.resolve_inputs(&transactions, limit).await?;
            Ok(TransactionsWithInputs {
                transactions,
                tx_inputs_by_transaction,
            })
        }
        .instrument(span)
        .await
    }

    /// One page of the transactions of block `block_hash`.
    ///
    /// When the window starts after the coinbase, the coinbase is fetched
    /// anyway for fees and miner but left out of `transactions`.
    pub async fn get_block_page(
        &self,
        block_hash: &str,
        offset: usize,
        limit: usize,
    ) -> Result<BlockPage, ExplorerError> {
        let span = spans::get_block_page(block_hash, offset, limit);
        self.get_block_page_inner(block_hash, offset, limit)
            .instrument(span)
            .await
    }

    async fn get_block_page_inner(
        &self,
        block_hash: &str,
        offset: usize,
        limit: usize,
    ) -> Result<BlockPage, ExplorerError> {
        let block = self.get_block_by_hash(block_hash).await?;

        let window_end = offset.saturating_add(limit).min(block.tx.len());
        let window = block.tx.get(offset..window_end).unwrap_or_default();

        let prepend_coinbase = offset > 0 && !block.tx.is_empty();
        let mut txids = Vec::with_capacity(window.len() + 1);
        if prepend_coinbase {
            txids.extend(block.tx.first().cloned());
        }
        txids.extend(window.iter().cloned());

        let mut transactions = self.get_raw_transactions(&txids).await?;

        let coinbase_tx = if prepend_coinbase {
            Some(transactions.remove(0))
        } else if offset == 0 {
            transactions.first().cloned()
        } else {
            None
        };

        let (total_fees, miner) = match &coinbase_tx {
            Some(coinbase) => (
                Some(block_total_fees(
                    coinbase,
                    block.height,
                    &self.config.coin,
                    self.config.network,
                )),
                identify_miner(coinbase, &self.config.coin.mining_pools).cloned(),
            ),
            None => (None, None),
        };

        let tx_inputs_by_transaction = self
            .resolve_inputs(&transactions, self.config.max_inputs_tracked)
            .await?;

        debug!(
            height = block.height,
            returned = transactions.len(),
            "Assembled block page"
        );

        Ok(BlockPage {
            block,
            coinbase_tx,
            total_fees,
            miner,
            transactions,
            tx_inputs_by_transaction,
        })
    }

    /// Fetches the previous transactions referenced by the first `limit`
    /// inputs of each transaction and maps them by input position.
    ///
    /// Unresolvable previous transactions are omitted; fetch failures propagate.
    pub(crate) async fn resolve_inputs(
        &self,
        transactions: &[Transaction],
        limit: usize,
    ) -> Result<TxInputsByTransaction, ExplorerError> {
        let span = spans::resolve_inputs(transactions.len(), limit);

        let mut seen = HashSet::new();
        let previous_txids: Vec<String> = transactions
            .iter()
            .flat_map(|tx| tx.vin.iter().take(limit))
            .filter_map(|input| input.txid.as_ref())
            .filter(|txid| seen.insert(txid.as_str()))
            .cloned()
            .collect();
        span.record("previous_txids", previous_txids.len());

        let previous = self
            .find_raw_transactions(&previous_txids)
            .instrument(span)
            .await?;
        let by_id: HashMap<&str, &Transaction> = previous
            .iter()
            .flatten()
            .map(|tx| (tx.txid.as_str(), tx))
            .collect();

        Ok(transactions
            .iter()
            .map(|tx| {
                let resolved: BTreeMap<usize, Transaction> = tx
                    .vin
                    .iter()
                    .take(limit)
                    .enumerate()
                    .filter_map(|(position, input)| {
                        let previous = by_id.get(input.txid.as_deref()?)?;
                        Some((position, (*previous).clone()))
                    })
                    .collect();
                (tx.txid.clone(), resolved)
            })
            .collect())
    }
}
