// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the composite explorer views
//!
//! Each test scripts a small chain on a [`MockNode`] and checks the shape of
//! the aggregated result, including ordering, omissions and error cases.

mod helpers;

use std::time::Duration;

use bigdecimal::BigDecimal;

use explorer_core::{BlockRef, ExplorerError, InputLimit};
use helpers::{
    block, block_hash, coinbase_tx, confirmed_tx, memory_api, mempool_entry, uncached_api,
    unconfirmed_tx, MockNode, TXS_PER_BLOCK,
};

fn block_with_proof(height: u64, proof_type: &str, difficulty: f64) -> explorer_core::rpc::Block {
    let mut block = block(height, &[]);
    block.proof_type = Some(proof_type.to_string());
    block.difficulty = Some(difficulty);
    block
}

/// Block 10 with a coinbase paying 50.25 and three spending transactions.
fn block_ten_node() -> MockNode {
    MockNode::new(20)
        .with_block(block(10, &["cb10", "t1", "t2", "t3"]))
        .with_transaction(coinbase_tx("cb10", 50.25))
        .with_transaction(confirmed_tx("t1", 11, &[("cb9", 0)]))
        .with_transaction(confirmed_tx("t2", 11, &[("unknown", 1)]))
        .with_transaction(confirmed_tx("t3", 11, &[("cb9", 0)]))
        .with_transaction(coinbase_tx("cb9", 50.0))
}

#[tokio::test]
async fn test_blocks_by_height_keep_request_order() {
    let node = MockNode::new(20)
        .with_blocks([2, 5, 8])
        .with_block_delay(5, Duration::from_millis(40));
    let api = uncached_api(node);

    let blocks = api.get_blocks_by_height(&[5, 2, 8]).await.unwrap();
    let heights: Vec<u64> = blocks.iter().map(|block| block.height).collect();

    assert_eq!(heights, vec![5, 2, 8], "Slow fetches must not reorder results");
}

#[tokio::test]
async fn test_blocks_by_height_fail_as_a_whole() {
    let api = uncached_api(MockNode::new(20).with_blocks([1, 2]));

    let result = api.get_blocks_by_height(&[1, 2, 3]).await;
    assert!(
        matches!(result, Err(ExplorerError::Rpc(_))),
        "A single missing height should fail the batch"
    );
}

#[tokio::test]
async fn test_blocks_by_hash_are_keyed_by_hash() {
    let api = memory_api(MockNode::new(20).with_blocks([3, 4]));

    let blocks = api
        .get_blocks_by_hash(&[block_hash(3), block_hash(4)])
        .await
        .unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[&block_hash(4)].height, 4);
}

#[tokio::test]
async fn test_raw_transactions_missing_id_is_not_found() {
    let api = memory_api(MockNode::new(20).with_transaction(confirmed_tx("known", 3, &[])));

    let result = api
        .get_raw_transactions(&["known".to_string(), "ghost".to_string()])
        .await;

    match result {
        Err(ExplorerError::NotFound { what }) => assert!(what.contains("ghost")),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unresolvable_inputs_are_omitted() {
    let api = memory_api(
        MockNode::new(20)
            .with_transaction(confirmed_tx("spend", 2, &[("a", 0), ("b", 1)]))
            .with_transaction(confirmed_tx("a", 5, &[])),
    );

    let result = api
        .get_raw_transactions_with_inputs(&["spend".to_string()], InputLimit::Configured)
        .await
        .unwrap();

    assert_eq!(result.transactions.len(), 1);
    let resolved = &result.tx_inputs_by_transaction["spend"];
    assert_eq!(resolved.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(resolved[&0].txid, "a");
}

#[tokio::test]
async fn test_input_limit_caps_resolved_positions() {
    let api = memory_api(
        MockNode::new(20)
            .with_transaction(confirmed_tx("spend", 2, &[("a", 0), ("b", 0), ("c", 0)]))
            .with_transaction(confirmed_tx("a", 5, &[]))
            .with_transaction(confirmed_tx("b", 5, &[]))
            .with_transaction(confirmed_tx("c", 5, &[])),
    );

    let limited = api
        .get_raw_transactions_with_inputs(&["spend".to_string()], InputLimit::Leading(2))
        .await
        .unwrap();
    assert_eq!(limited.tx_inputs_by_transaction["spend"].len(), 2);

    let unbounded = api
        .get_raw_transactions_with_inputs(&["spend".to_string()], InputLimit::from(-1))
        .await
        .unwrap();
    assert_eq!(unbounded.tx_inputs_by_transaction["spend"].len(), 3);
}

#[tokio::test]
async fn test_shared_previous_transaction_fetched_once() {
    let api = uncached_api(
        MockNode::new(20)
            .with_transaction(confirmed_tx("x", 2, &[("shared", 0)]))
            .with_transaction(confirmed_tx("y", 2, &[("shared", 1)]))
            .with_transaction(confirmed_tx("shared", 4, &[])),
    );

    let result = api
        .get_raw_transactions_with_inputs(&["x".to_string(), "y".to_string()], InputLimit::Configured)
        .await
        .unwrap();

    assert_eq!(result.tx_inputs_by_transaction["x"][&0].txid, "shared");
    assert_eq!(result.tx_inputs_by_transaction["y"][&0].txid, "shared");
    assert_eq!(
        api.rpc().calls("getrawtransaction"),
        3,
        "Two primaries plus one shared previous transaction"
    );
}

#[tokio::test]
async fn test_block_page_after_coinbase() {
    let api = memory_api(block_ten_node());

    let page = api.get_block_page(&block_hash(10), 1, 2).await.unwrap();

    let txids: Vec<&str> = page.transactions.iter().map(|tx| tx.txid.as_str()).collect();
    assert_eq!(txids, vec!["t1", "t2"], "Coinbase must not appear in a later window");
    assert_eq!(page.coinbase_tx.as_ref().map(|tx| tx.txid.as_str()), Some("cb10"));
    assert_eq!(page.total_fees, Some("0.25".parse::<BigDecimal>().unwrap()));
    assert!(page.miner.is_none());

    assert!(!page.tx_inputs_by_transaction.contains_key("cb10"));
    assert_eq!(page.tx_inputs_by_transaction["t1"][&0].txid, "cb9");
    assert!(page.tx_inputs_by_transaction["t2"].is_empty());
}

#[tokio::test]
async fn test_block_page_first_window_includes_coinbase() {
    let api = memory_api(block_ten_node());

    let page = api.get_block_page(&block_hash(10), 0, 2).await.unwrap();

    let txids: Vec<&str> = page.transactions.iter().map(|tx| tx.txid.as_str()).collect();
    assert_eq!(txids, vec!["cb10", "t1"]);
    assert_eq!(page.coinbase_tx.as_ref().map(|tx| tx.txid.as_str()), Some("cb10"));
    assert!(page.total_fees.is_some());
}

#[tokio::test]
async fn test_block_page_window_clamped_to_block() {
    let api = memory_api(block_ten_node());

    let page = api.get_block_page(&block_hash(10), 3, 50).await.unwrap();
    let txids: Vec<&str> = page.transactions.iter().map(|tx| tx.txid.as_str()).collect();
    assert_eq!(txids, vec!["t3"]);

    let past_end = api.get_block_page(&block_hash(10), 10, 5).await.unwrap();
    assert!(past_end.transactions.is_empty());
    assert!(past_end.coinbase_tx.is_some());
}

#[tokio::test]
async fn test_mempool_page_skips_departed_transactions() {
    let api = memory_api(
        MockNode::new(20)
            .with_mempool_entry("m1", mempool_entry(0.0001, 250, 0))
            .with_mempool_entry("m2", mempool_entry(0.0002, 250, 0))
            .with_mempool_entry("m3", mempool_entry(0.0003, 250, 0))
            .with_transaction(unconfirmed_tx("m1", &[("funding", 0)]))
            .with_transaction(unconfirmed_tx("m3", &[]))
            .with_transaction(confirmed_tx("funding", 8, &[])),
    );

    let page = api.get_mempool_details(0, 3).await.unwrap();
    assert_eq!(page.tx_count, 3);
    let txids: Vec<&str> = page.transactions.iter().map(|tx| tx.txid.as_str()).collect();
    assert_eq!(txids, vec!["m1", "m3"]);
    assert_eq!(page.tx_inputs_by_transaction["m1"][&0].txid, "funding");

    let second = api.get_mempool_details(2, 10).await.unwrap();
    assert_eq!(second.transactions.len(), 1);
    assert_eq!(second.transactions[0].txid, "m3");
}

#[tokio::test]
async fn test_mempool_tx_details() {
    let api = memory_api(
        MockNode::new(20)
            .with_mempool_entry("pending", mempool_entry(0.001, 400, 1_700_000_000))
            .with_transaction(unconfirmed_tx("pending", &[])),
    );

    let details = api.get_mempool_tx_details("pending").await.unwrap().unwrap();
    assert_eq!(details.entry.size, Some(400));
    assert_eq!(details.tx.map(|tx| tx.txid), Some("pending".to_string()));

    api.get_mempool_tx_details("pending").await.unwrap();
    assert_eq!(api.rpc().calls("getmempoolentry"), 1);

    assert!(api.get_mempool_tx_details("gone").await.unwrap().is_none());
}

#[tokio::test]
async fn test_mempool_stats_counts_every_entry() {
    let api = memory_api(
        MockNode::new(20)
            .with_mempool_entry("a", mempool_entry(0.000_015, 1_000, 1_700_000_000))
            .with_mempool_entry("b", mempool_entry(0.000_03, 1_000, 1_700_000_100))
            .with_mempool_entry("c", mempool_entry(0.000_1, 1_000, 1_700_000_200)),
    );

    let stats = api.get_mempool_stats().await.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.total_bytes, 3_000);
    assert_eq!(stats.satoshi_per_byte_bucket_counts.iter().sum::<usize>(), 3);
    assert_eq!(stats.age_bucket_tx_counts.iter().sum::<usize>(), 3);
    assert_eq!(stats.size_bucket_tx_counts.iter().sum::<usize>(), 3);
    assert_eq!(
        stats.satoshi_per_byte_bucket_labels.len(),
        stats.satoshi_per_byte_bucket_maxima.len() + 1
    );
}

#[tokio::test]
async fn test_tx_count_stats_rejects_inverted_range() {
    let api = memory_api(MockNode::new(100));

    let result = api
        .get_tx_count_stats(10, BlockRef::Height(100), BlockRef::Height(50))
        .await;

    assert!(matches!(result, Err(ExplorerError::InvalidRange { .. })));
    assert_eq!(api.rpc().calls("getchaintxstats"), 0);
}

#[tokio::test]
async fn test_tx_count_stats_rejects_start_before_genesis() {
    let api = memory_api(MockNode::new(100));

    let result = api
        .get_tx_count_stats(4, BlockRef::Height(-150), BlockRef::Tip)
        .await;

    assert!(matches!(result, Err(ExplorerError::InvalidRange { .. })));
}

#[tokio::test]
async fn test_tx_count_stats_over_whole_chain() {
    let api = memory_api(MockNode::new(100));

    let stats = api
        .get_tx_count_stats(5, BlockRef::Genesis, BlockRef::Tip)
        .await
        .unwrap();

    let series = &stats.tx_count_stats;
    assert_eq!(series.tx_counts.len(), 5);
    assert_eq!(series.tx_rates.len(), 5);
    assert_eq!(series.tx_labels, vec![0, 1, 2, 3, 4]);

    let xs: Vec<i64> = series.tx_counts.iter().map(|point| point.x).collect();
    assert_eq!(xs, vec![1, 26, 51, 76, 90]);
    assert_eq!(series.tx_counts[0].y, TXS_PER_BLOCK);
    assert_eq!(series.tx_counts[4].y, 90 * TXS_PER_BLOCK);

    assert_eq!(stats.total_tx_count, 100 * TXS_PER_BLOCK);
    assert_eq!(stats.blockchain_info.blocks, 100);
    assert_eq!(api.rpc().calls("getchaintxstats"), 5);
}

#[tokio::test]
async fn test_block_type_stats_over_recent_blocks() {
    let api = memory_api(
        MockNode::new(104)
            .with_block(block_with_proof(101, "Proof-of-work (sha256d)", 2.0))
            .with_block(block_with_proof(102, "Proof-of-stake", 6.0))
            .with_block(block_with_proof(103, "Proof-of-work (RandomX)", 3.0))
            .with_block(block_with_proof(104, "Proof-of-stake", 7.0)),
    );

    let stats = api.get_block_type_stats(100).await.unwrap();

    assert_eq!(stats.start_height, 100);
    assert_eq!(stats.end_height, 104);
    assert_eq!(stats.pos_count, 2);
    assert_eq!(stats.pos_diff, 7.0, "Difficulty comes from the newest block");
    assert_eq!(stats.pos_percent, "50.00");
    assert_eq!(stats.randomx_percent, "25.00");
    assert_eq!(stats.prog_pow_count, 0);
}

#[tokio::test]
async fn test_block_type_stats_rejects_start_at_tip() {
    let api = memory_api(MockNode::new(104));

    let result = api.get_block_type_stats(104).await;
    assert!(matches!(result, Err(ExplorerError::InvalidRange { .. })));
}

#[tokio::test]
async fn test_peer_summary_groups_versions_and_services() {
    let api = memory_api(
        MockNode::new(20)
            .with_peer("/Veil:1.1.0/", "000000000000040d")
            .with_peer("/Veil:1.0.4/", "000000000000040d")
            .with_peer("/Veil:1.1.0/", "0000000000000409"),
    );

    let summary = api.get_peer_summary().await.unwrap();

    assert_eq!(summary.peers.len(), 3);
    assert_eq!(
        summary.version_summary,
        vec![
            ("/Veil:1.1.0/".to_string(), 2),
            ("/Veil:1.0.4/".to_string(), 1)
        ]
    );
    assert_eq!(summary.services_summary[0], ("000000000000040d".to_string(), 2));
}

#[tokio::test]
async fn test_help_is_parsed_and_cached() {
    let api = memory_api(
        MockNode::new(20)
            .with_help("== Blockchain ==\ngetblockcount\ngetblockhash height\n== Network ==\ngetpeerinfo\n")
            .with_method_help(
                "getblockhash",
                "getblockhash height\n\nArguments:\n1. height         (numeric, required) The height index\n\nResult:\n\"hash\"\n",
            ),
    );

    let sections = api.get_help().await.unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].methods.len(), 2);
    assert_eq!(sections[1].methods[0].name, "getpeerinfo");

    let method = api.get_rpc_method_help("getblockhash").await.unwrap();
    assert_eq!(method.args.len(), 1);
    assert_eq!(method.args[0].name, "height");
    assert_eq!(method.args[0].properties, vec!["numeric", "required"]);

    api.get_help().await.unwrap();
    api.get_rpc_method_help("getblockhash").await.unwrap();
    assert_eq!(api.rpc().calls("help"), 2);
}

#[tokio::test]
async fn test_unknown_method_help_is_an_rpc_error() {
    let api = memory_api(MockNode::new(20));

    let result = api.get_rpc_method_help("nosuchmethod").await;
    assert!(matches!(result, Err(ExplorerError::Rpc(_))));
}
