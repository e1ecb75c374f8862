// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain transaction-count and transaction-rate series.
//!
//! Samples `getchaintxstats` at evenly spaced (in blocks) points between two
//! heights. Each sample is a window ending at the tip, so a sample's start
//! height is `tip - window_block_count` and the cumulative transaction count at
//! that height is `txcount - window_tx_count`.

use std::fmt;
use std::str::FromStr;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, Instrument};

use super::CoreApi;
use crate::config::constants::MIN_CHAIN_TX_STATS_WINDOW;
use crate::errors::ExplorerError;
use crate::rpc::{BlockchainInfo, ChainTxStats, NodeRpc};
use crate::spans;

/// A block height as accepted by range queries.
///
/// Parses `genesis`/`first`/`zero`, `latest`/`tip`/`newest`, or a signed
/// integer; negative heights count back from the tip.
///
/// ```
/// use explorer_core::BlockRef;
///
/// assert_eq!("genesis".parse::<BlockRef>().unwrap(), BlockRef::Genesis);
/// assert_eq!("tip".parse::<BlockRef>().unwrap(), BlockRef::Tip);
/// assert_eq!("-100".parse::<BlockRef>().unwrap(), BlockRef::Height(-100));
/// assert_eq!(BlockRef::Height(-100).resolve(1_000), 900);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Genesis,
    Tip,
    Height(i64),
}

impl BlockRef {
    /// Absolute height given the current `tip`. May be negative if a relative
    /// height reaches past genesis.
    pub fn resolve(self, tip: u64) -> i64 {
        let tip = i64::try_from(tip).unwrap_or(i64::MAX);
        match self {
            BlockRef::Genesis => 0,
            BlockRef::Tip => tip,
            BlockRef::Height(height) if height < 0 => tip.saturating_add(height),
            BlockRef::Height(height) => height,
        }
    }
}

impl From<i64> for BlockRef {
    fn from(height: i64) -> Self {
        BlockRef::Height(height)
    }
}

impl FromStr for BlockRef {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genesis" | "first" | "zero" => Ok(BlockRef::Genesis),
            "latest" | "tip" | "newest" => Ok(BlockRef::Tip),
            other => other.parse::<i64>().map(BlockRef::Height).map_err(|_| {
                ExplorerError::invalid_argument(format!("'{s}' is not a block height or alias"))
            }),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Genesis => f.write_str("genesis"),
            BlockRef::Tip => f.write_str("latest"),
            BlockRef::Height(height) => write!(f, "{height}"),
        }
    }
}

/// Cumulative transaction count at block `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxCountPoint {
    pub x: i64,
    pub y: u64,
}

/// Average transactions per second over the window starting at block `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePoint {
    pub x: i64,
    pub y: Option<f64>,
}

/// Three aligned series, oldest sample first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxCountSeries {
    pub tx_counts: Vec<TxCountPoint>,
    pub tx_rates: Vec<RatePoint>,
    /// Sample index of each point
    pub tx_labels: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxCountStats {
    pub tx_count_stats: TxCountSeries,
    #[serde(rename = "getblockchaininfo")]
    pub blockchain_info: BlockchainInfo,
    /// Total chain transactions as of the widest sample
    pub total_tx_count: u64,
}

/// Window sizes (in blocks, ending at the tip) for each sample point, widest first.
pub(crate) fn sample_windows(data_points: usize, tip: i64, start: i64, end: i64) -> Vec<u64> {
    let span = (end - start) as f64;
    let steps = data_points.saturating_sub(1).max(1) as f64;
    let floor = MIN_CHAIN_TX_STATS_WINDOW as f64;

    (0..data_points)
        .map(|i| {
            let window = (tip - start) as f64 - (i as f64) * span / steps - 1.0;
            window.max(floor).trunc() as u64
        })
        .collect()
}

/// Turns widest-first samples into oldest-first series.
///
/// Samples without a `window_tx_count` are dropped.
pub(crate) fn build_series(tip: u64, samples: &[ChainTxStats]) -> TxCountSeries {
    let tip = i64::try_from(tip).unwrap_or(i64::MAX);
    let mut series = TxCountSeries::default();

    for (label, sample) in samples.iter().enumerate() {
        let Some(window_tx_count) = sample.window_tx_count else {
            debug!(label, "Sample without window_tx_count skipped");
            continue;
        };
        let window_blocks = sample
            .window_block_count
            .and_then(|count| i64::try_from(count).ok())
            .unwrap_or(0);
        let x = tip - window_blocks;

        series.tx_counts.push(TxCountPoint {
            x,
            y: sample.txcount.saturating_sub(window_tx_count),
        });
        series.tx_rates.push(RatePoint {
            x,
            y: sample.txrate,
        });
        series.tx_labels.push(label);
    }

    series
}

impl<R: NodeRpc> CoreApi<R> {
    /// Samples chain transaction counts at `data_points` evenly spaced heights
    /// between `start` and `end`.
    ///
    /// Windows narrower than 10 blocks are widened to 10. Fails with
    /// [`ExplorerError::InvalidRange`] when the resolved start is above the
    /// resolved end or before genesis.
    pub async fn get_tx_count_stats(
        &self,
        data_points: usize,
        start: BlockRef,
        end: BlockRef,
    ) -> Result<TxCountStats, ExplorerError> {
        let span = spans::get_tx_count_stats(data_points);
        self.get_tx_count_stats_inner(data_points, start, end)
            .instrument(span)
            .await
    }

    async fn get_tx_count_stats_inner(
        &self,
        data_points: usize,
        start: BlockRef,
        end: BlockRef,
    ) -> Result<TxCountStats, ExplorerError> {
        if data_points == 0 {
            return Err(ExplorerError::invalid_argument(
                "data_points must be at least 1",
            ));
        }

        let blockchain_info = self.get_blockchain_info().await?;
        let tip = blockchain_info.blocks;
        let start_height = start.resolve(tip);
        let end_height = end.resolve(tip);
        tracing::Span::current()
            .record("start_height", start_height)
            .record("end_height", end_height);

        if start_height > end_height {
            return Err(ExplorerError::invalid_range(format!(
                "start ({start} -> {start_height}) is above end ({end} -> {end_height})"
            )));
        }
        if start_height < 0 {
            return Err(ExplorerError::invalid_range(format!(
                "start ({start} -> {start_height}) is before genesis"
            )));
        }

        let tip_height = i64::try_from(tip).unwrap_or(i64::MAX);
        let windows = sample_windows(data_points, tip_height, start_height, end_height);
        let samples = try_join_all(windows.iter().map(|&window| self.get_chain_tx_stats(window)))
            .await?;

        let total_tx_count = samples.first().map(|sample| sample.txcount).unwrap_or(0);
        Ok(TxCountStats {
            tx_count_stats: build_series(tip, &samples),
            blockchain_info,
            total_tx_count,
        })
    }
}
