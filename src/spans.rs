// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for explorer aggregations.
//!
//! Telemetry stays out of the business logic: each instrumented operation has a
//! helper here and attaches the returned span to its future.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T, ExplorerError> {
//!     self.my_operation_inner(param)
//!         .instrument(spans::my_operation(param))
//!         .await
//! }
//! ```

use tracing::{Level, Span};

/// Create span for resolving the previous transactions referenced by inputs.
///
/// Parent: any aggregation that returns an input map
/// Children: one cached `getrawtransaction` per distinct previous txid
#[inline]
pub(crate) fn resolve_inputs(transaction_count: usize, input_limit: usize) -> Span {
    tracing::debug_span!(
        "explorer.resolve_inputs",
        transaction_count = transaction_count,
        input_limit = input_limit,
        previous_txids = tracing::field::Empty,
    )
}

/// Create span for fetching transactions together with their resolved inputs.
///
/// Parent: None (root span for this operation)
/// Children: resolve_inputs
#[inline]
pub(crate) fn get_raw_transactions_with_inputs(txid_count: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.get_raw_transactions_with_inputs",
        txid_count = txid_count,
    )
}

/// Create span for assembling one page of a block's transactions.
///
/// Parent: None (root span for this operation)
/// Children: resolve_inputs
#[inline]
pub(crate) fn get_block_page(block_hash: &str, offset: usize, limit: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.get_block_page",
        block_hash = %block_hash,
        offset = offset,
        limit = limit,
    )
}

/// Create span for sampling `getchaintxstats` across a block range.
#[inline]
pub(crate) fn get_tx_count_stats(data_points: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.get_tx_count_stats",
        data_points = data_points,
        start_height = tracing::field::Empty,
        end_height = tracing::field::Empty,
    )
}

/// Create span for one page of mempool transactions.
#[inline]
pub(crate) fn get_mempool_details(offset: usize, count: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.get_mempool_details",
        offset = offset,
        count = count,
    )
}

#[inline]
pub(crate) fn get_mempool_stats() -> Span {
    tracing::span!(Level::INFO, "explorer.get_mempool_stats")
}

#[inline]
pub(crate) fn get_peer_summary() -> Span {
    tracing::span!(Level::INFO, "explorer.get_peer_summary")
}

/// Create span for classifying recent blocks by proof type.
///
/// Parent: None (root span for this operation)
/// Children: get_blocks_by_height
#[inline]
pub(crate) fn get_block_type_stats(start_height: u64) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.get_block_type_stats",
        start_height = start_height,
    )
}

/// Create span for a concurrent batch of block fetches.
#[inline]
pub(crate) fn get_blocks(block_count: usize) -> Span {
    tracing::debug_span!("explorer.get_blocks", block_count = block_count)
}

/// Create span for choosing the cache backends at startup.
#[inline]
pub(crate) fn select_cache_pools(redis_configured: bool, disabled: bool) -> Span {
    tracing::span!(
        Level::INFO,
        "explorer.select_cache_pools",
        redis_configured = redis_configured,
        disabled = disabled,
    )
}
