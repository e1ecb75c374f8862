// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Probe a node through the explorer data-access layer.
//!
//! Reads `VEILEXP_*` configuration (and `.env`), then prints chain, peer and
//! mempool summaries as JSON. Set `RUST_LOG=explorer_core=debug` to watch
//! cache hits and node calls.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use explorer_core::{CoreApi, ExplorerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExplorerConfig::from_env().context("Failed to load configuration")?;
    info!(url = %config.rpc.url, network = %config.network, "Connecting to node");

    let api = CoreApi::from_config(config)
        .await
        .context("Failed to set up node client")?;

    let blockchain_info = api
        .get_blockchain_info()
        .await
        .context("getblockchaininfo failed")?;
    let peers = api.get_peer_summary().await.context("getpeerinfo failed")?;
    let mempool = api.get_mempool_stats().await.context("getrawmempool failed")?;

    let report = json!({
        "blockchainInfo": blockchain_info,
        "genesisBlockHash": api.genesis_block_hash(),
        "versionSummary": peers.version_summary,
        "servicesSummary": peers.services_summary,
        "mempool": {
            "count": mempool.count,
            "totalFees": mempool.total_fees,
            "averageFeePerByte": mempool.average_fee_per_byte,
            "satoshiPerByteBucketLabels": mempool.satoshi_per_byte_bucket_labels,
            "satoshiPerByteBucketCounts": mempool.satoshi_per_byte_bucket_counts,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    api.log_cache_sizes().await;
    Ok(())
}
