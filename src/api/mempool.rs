// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Mempool pages and the mempool fee/age/size summary.

use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};

use super::aggregate::TxInputsByTransaction;
use super::CoreApi;
use crate::cache::{fetch_cached, CacheKey};
use crate::config::constants::{max_age, MEMPOOL_HISTOGRAM_BUCKETS, SATOSHIS_PER_COIN};
use crate::errors::ExplorerError;
use crate::rpc::{MempoolEntry, NodeRpc, RawMempool, Transaction};
use crate::spans;

/// A slice of the mempool with resolved inputs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolPage {
    /// Size of the whole mempool when the page was taken
    pub tx_count: usize,
    pub transactions: Vec<Transaction>,
    pub tx_inputs_by_transaction: TxInputsByTransaction,
}

/// Mempool metadata of one transaction together with the transaction itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MempoolTxDetails {
    pub entry: MempoolEntry,
    pub tx: Option<Transaction>,
}

/// Totals for one satoshi-per-byte bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBucket {
    pub count: usize,
    pub total_fees: f64,
    pub total_bytes: u64,
}

/// Histogram-ready mempool statistics.
///
/// Fees are in whole coins, sizes in (virtual) bytes, ages in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolSummary {
    pub count: usize,
    pub total_fees: f64,
    pub total_bytes: u64,
    pub average_fee: f64,
    pub average_fee_per_byte: f64,
    pub max_fee: f64,
    pub max_fee_per_byte: f64,
    pub max_age: f64,
    pub max_size: u64,
    pub satoshi_per_byte_buckets: Vec<FeeBucket>,
    pub satoshi_per_byte_bucket_labels: Vec<String>,
    pub satoshi_per_byte_bucket_maxima: Vec<f64>,
    pub satoshi_per_byte_bucket_counts: Vec<usize>,
    pub satoshi_per_byte_bucket_total_fees: Vec<f64>,
    pub age_bucket_tx_counts: Vec<usize>,
    pub age_bucket_labels: Vec<String>,
    pub size_bucket_tx_counts: Vec<usize>,
    pub size_bucket_labels: Vec<String>,
}

struct TxMetrics {
    fee: f64,
    size: u64,
    fee_per_byte: f64,
    age: f64,
}

impl TxMetrics {
    fn new(entry: &MempoolEntry, now_secs: f64) -> Self {
        let fee = entry.modified_fee();
        let size = entry.effective_size();
        let fee_per_byte = if size == 0 { 0.0 } else { fee / size as f64 };
        Self {
            fee,
            size,
            fee_per_byte,
            age: (now_secs - entry.time as f64).max(0.0),
        }
    }
}

/// Index of the equal-width bucket holding `value` among `count` buckets over `0..=max`.
fn linear_bucket(value: f64, max: f64, count: usize) -> usize {
    if max <= 0.0 {
        return 0;
    }
    let width = max / count as f64;
    ((value / width) as usize).min(count - 1)
}

/// Index of the first bound strictly above `satoshi_per_byte`, else the overflow bucket.
fn fee_bucket(satoshi_per_byte: f64, maxima: &[f64]) -> usize {
    maxima
        .iter()
        .position(|&bound| bound > satoshi_per_byte)
        .unwrap_or(maxima.len())
}

fn fee_bucket_labels(maxima: &[f64]) -> Vec<String> {
    let mut labels = Vec::with_capacity(maxima.len() + 1);
    let mut lower = 0.0;
    for &upper in maxima {
        labels.push(format!("[{lower} - {upper})"));
        lower = upper;
    }
    labels.push(format!("{lower}+"));
    labels
}

fn age_bucket_labels(max_age: f64, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let low = i as f64 * max_age / count as f64;
            let high = (i + 1) as f64 * max_age / count as f64;
            if max_age > 600.0 {
                format!("{:.1} - {:.1} min", low / 60.0, high / 60.0)
            } else {
                format!("{} - {} sec", low.trunc(), high.trunc())
            }
        })
        .collect()
}

fn size_bucket_labels(max_size: u64, count: usize) -> Vec<String> {
    let bound = |i: usize| (i as u64 * max_size) / count as u64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                format!("{}+", bound(i))
            } else {
                format!("{} - {}", bound(i), bound(i + 1))
            }
        })
        .collect()
}

/// Buckets every mempool transaction by fee rate, age and size.
///
/// `maxima` are the ascending satoshi-per-byte upper bounds; one extra bucket
/// catches everything at or above the last bound. Age and size use
/// [`MEMPOOL_HISTOGRAM_BUCKETS`] equal-width buckets spanning zero to the
/// observed maximum. Each transaction lands in exactly one bucket of each kind.
pub fn summarize_mempool(mempool: &RawMempool, maxima: &[f64], now_secs: f64) -> MempoolSummary {
    let buckets = MEMPOOL_HISTOGRAM_BUCKETS;
    let metrics: Vec<TxMetrics> = mempool
        .values()
        .map(|entry| TxMetrics::new(entry, now_secs))
        .collect();

    let mut summary = MempoolSummary {
        satoshi_per_byte_buckets: vec![FeeBucket::default(); maxima.len() + 1],
        age_bucket_tx_counts: vec![0; buckets],
        size_bucket_tx_counts: vec![0; buckets],
        ..MempoolSummary::default()
    };

    for tx in &metrics {
        summary.max_fee = summary.max_fee.max(tx.fee);
        summary.max_fee_per_byte = summary.max_fee_per_byte.max(tx.fee_per_byte);
        summary.max_age = summary.max_age.max(tx.age);
        summary.max_size = summary.max_size.max(tx.size);
    }

    for tx in &metrics {
        let bucket =
            &mut summary.satoshi_per_byte_buckets[fee_bucket(tx.fee_per_byte * SATOSHIS_PER_COIN, maxima)];
        bucket.count += 1;
        bucket.total_fees += tx.fee;
        bucket.total_bytes += tx.size;

        summary.count += 1;
        summary.total_fees += tx.fee;
        summary.total_bytes += tx.size;

        summary.age_bucket_tx_counts[linear_bucket(tx.age, summary.max_age, buckets)] += 1;
        summary.size_bucket_tx_counts
            [linear_bucket(tx.size as f64, summary.max_size as f64, buckets)] += 1;
    }

    if summary.count > 0 {
        summary.average_fee = summary.total_fees / summary.count as f64;
    }
    if summary.total_bytes > 0 {
        summary.average_fee_per_byte = summary.total_fees / summary.total_bytes as f64;
    }

    summary.satoshi_per_byte_bucket_labels = fee_bucket_labels(maxima);
    summary.satoshi_per_byte_bucket_maxima = maxima.to_vec();
    summary.satoshi_per_byte_bucket_counts = summary
        .satoshi_per_byte_buckets
        .iter()
        .map(|bucket| bucket.count)
        .collect();
    summary.satoshi_per_byte_bucket_total_fees = summary
        .satoshi_per_byte_buckets
        .iter()
        .map(|bucket| bucket.total_fees)
        .collect();
    summary.age_bucket_labels = age_bucket_labels(summary.max_age, buckets);
    summary.size_bucket_labels = size_bucket_labels(summary.max_size, buckets);

    summary
}

impl<R: NodeRpc> CoreApi<R> {
    /// `count` mempool transactions starting at `offset` in node order.
    ///
    /// Transactions that leave the mempool between listing and fetching are
    /// skipped rather than failing the page.
    pub async fn get_mempool_details(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<MempoolPage, ExplorerError> {
        let span = spans::get_mempool_details(offset, count);
        async move {
            let txids = self.get_mempool_txids().await?;
            let end = offset.saturating_add(count).min(txids.len());
            let page = txids.get(offset..end).unwrap_or_default();

            let transactions: Vec<Transaction> = self
                .find_raw_transactions(page)
                .await?
                .into_iter()
                .flatten()
                .collect();
            if transactions.len() < page.len() {
                debug!(
                    requested = page.len(),
                    found = transactions.len(),
                    "Some mempool transactions disappeared before they were fetched"
                );
            }

            let tx_inputs_by_transaction = self
                .resolve_inputs(&transactions, self.config.max_inputs_tracked)
                .await?;

            Ok(MempoolPage {
                tx_count: txids.len(),
                transactions,
                tx_inputs_by_transaction,
            })
        }
        .instrument(span)
        .await
    }

    /// Mempool entry plus transaction for `txid`; `Ok(None)` once it left the mempool.
    pub async fn get_mempool_tx_details(
        &self,
        txid: &str,
    ) -> Result<Option<MempoolTxDetails>, ExplorerError> {
        fetch_cached(
            self.pools.misc.as_ref(),
            &CacheKey::MempoolTxDetails(txid.to_string()),
            max_age::MEMPOOL_TX_DETAILS,
            || async {
                let (entry, tx) = tokio::join!(
                    self.rpc.get_mempool_entry(txid),
                    self.rpc.get_raw_transaction(txid)
                );
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) if e.is_not_found() => return Ok(None),
                    Err(e) => return Err(ExplorerError::from(e)),
                };
                Ok::<_, ExplorerError>(Some(MempoolTxDetails { entry, tx: tx? }))
            },
            |_| true,
        )
        .await
    }

    /// Fee-rate, age and size histograms of the current mempool.
    pub async fn get_mempool_stats(&self) -> Result<MempoolSummary, ExplorerError> {
        async move {
            let mempool = self.get_raw_mempool().await?;
            let now_secs = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
            Ok(summarize_mempool(
                &mempool,
                &self.config.coin.fee_satoshi_per_byte_bucket_maxima,
                now_secs,
            ))
        }
        .instrument(spans::get_mempool_stats())
        .await
    }
}
