// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Share of recent blocks produced by each consensus mechanism.

use serde::Serialize;
use tracing::Instrument;

use super::CoreApi;
use crate::errors::ExplorerError;
use crate::rpc::{Block, NodeRpc};
use crate::spans;

/// Consensus mechanism of a block, from its `proof_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofClass {
    ProofOfStake,
    Sha256d,
    RandomX,
    ProgPow,
}

impl ProofClass {
    /// Anything not recognized as proof-of-work counts as proof-of-stake.
    pub fn of(block: &Block) -> Self {
        match block
            .proof_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("proof-of-work (sha256d)") => ProofClass::Sha256d,
            Some("proof-of-work (randomx)") => ProofClass::RandomX,
            Some("proof-of-work (progpow)") => ProofClass::ProgPow,
            _ => ProofClass::ProofOfStake,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    difficulty: f64,
}

impl Tally {
    /// Keeps the first difficulty seen; blocks arrive newest first.
    fn add(&mut self, block: &Block) {
        if self.count == 0 {
            self.difficulty = block.difficulty.unwrap_or(0.0);
        }
        self.count += 1;
    }

    fn percent(&self, sample: usize) -> String {
        if sample == 0 {
            return "0.00".to_string();
        }
        format!("{:.2}", self.count as f64 / sample as f64 * 100.0)
    }
}

/// Block counts, latest difficulty and share per consensus mechanism.
///
/// Percentages are pre-formatted with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockTypeStats {
    pub start_height: u64,
    pub end_height: u64,
    pub pos_count: u64,
    pub pos_diff: f64,
    pub pos_percent: String,
    pub sha256d_count: u64,
    pub sha256d_diff: f64,
    pub sha256d_percent: String,
    pub randomx_count: u64,
    pub randomx_diff: f64,
    pub randomx_percent: String,
    pub prog_pow_count: u64,
    pub prog_pow_diff: f64,
    pub prog_pow_percent: String,
}

impl BlockTypeStats {
    /// Classifies `blocks`, which must be ordered newest first.
    pub fn from_blocks(start_height: u64, blocks: &[Block]) -> Self {
        let mut pos = Tally::default();
        let mut sha256d = Tally::default();
        let mut randomx = Tally::default();
        let mut progpow = Tally::default();

        for block in blocks {
            let tally = match ProofClass::of(block) {
                ProofClass::ProofOfStake => &mut pos,
                ProofClass::Sha256d => &mut sha256d,
                ProofClass::RandomX => &mut randomx,
                ProofClass::ProgPow => &mut progpow,
            };
            tally.add(block);
        }

        let sample = blocks.len();
        Self {
            start_height,
            end_height: blocks
                .iter()
                .map(|block| block.height)
                .max()
                .unwrap_or(start_height),
            pos_count: pos.count,
            pos_diff: pos.difficulty,
            pos_percent: pos.percent(sample),
            sha256d_count: sha256d.count,
            sha256d_diff: sha256d.difficulty,
            sha256d_percent: sha256d.percent(sample),
            randomx_count: randomx.count,
            randomx_diff: randomx.difficulty,
            randomx_percent: randomx.percent(sample),
            prog_pow_count: progpow.count,
            prog_pow_diff: progpow.difficulty,
            prog_pow_percent: progpow.percent(sample),
        }
    }
}

impl<R: NodeRpc> CoreApi<R> {
    /// Proof-type breakdown of every block above `start_height` up to the tip.
    ///
    /// Fails with [`ExplorerError::InvalidRange`] when `start_height` is at or
    /// above the tip.
    pub async fn get_block_type_stats(&self, start_height: u64) -> Result<BlockTypeStats, ExplorerError> {
        async move {
            let tip = self.get_blockchain_info().await?.blocks;
            if start_height >= tip {
                return Err(ExplorerError::invalid_range(format!(
                    "start height {start_height} is not below the tip {tip}"
                )));
            }

            let heights: Vec<u64> = ((start_height + 1)..=tip).rev().collect();
            let blocks = self.get_blocks_by_height(&heights).await?;
            Ok(BlockTypeStats::from_blocks(start_height, &blocks))
        }
        .instrument(spans::get_block_type_stats(start_height))
        .await
    }
}
