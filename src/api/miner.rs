// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block fee and miner attribution from the coinbase transaction.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};

use crate::coins::{CoinParams, MiningPool, Network};
use crate::rpc::Transaction;

/// Total fees collected by a block: coinbase outputs minus the subsidy at `height`.
///
/// Never negative; a coinbase that claims less than the subsidy yields zero.
pub fn block_total_fees(
    coinbase: &Transaction,
    height: u64,
    coin: &CoinParams,
    network: Network,
) -> BigDecimal {
    let claimed: BigDecimal = coinbase
        .vout
        .iter()
        .filter_map(|out| out.value)
        .filter_map(|value| BigDecimal::from_str(&value.to_string()).ok())
        .sum();

    let fees = claimed - coin.block_reward(height, network);
    if fees < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        fees.normalized()
    }
}

/// The known pool that mined a block, judged from its coinbase transaction.
///
/// Coinbase script tags are checked first, then payout addresses.
pub fn identify_miner<'a>(coinbase: &Transaction, pools: &'a [MiningPool]) -> Option<&'a MiningPool> {
    let script_text = coinbase
        .vin
        .first()
        .and_then(|input| input.coinbase.as_deref())
        .and_then(|script| hex::decode(script).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

    if let Some(text) = &script_text {
        let tagged = pools
            .iter()
            .find(|pool| pool.tags.iter().any(|tag| text.contains(tag.as_str())));
        if tagged.is_some() {
            return tagged;
        }
    }

    pools.iter().find(|pool| {
        coinbase
            .vout
            .iter()
            .filter_map(|out| out.script_pub_key.as_ref())
            .flat_map(|script| script.all_addresses())
            .any(|address| pool.payout_addresses.iter().any(|payout| payout == address))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coinbase(script: &str, outputs: serde_json::Value) -> Transaction {
        serde_json::from_value(json!({
            "txid": "cb",
            "confirmations": 1,
            "vin": [{"coinbase": script}],
            "vout": outputs,
        }))
        .unwrap()
    }

    fn pools() -> Vec<MiningPool> {
        vec![
            MiningPool {
                name: "Tagged Pool".into(),
                tags: vec!["/tagpool/".into()],
                payout_addresses: vec![],
            },
            MiningPool {
                name: "Address Pool".into(),
                tags: vec![],
                payout_addresses: vec!["VpayoutAddr".into()],
            },
        ]
    }

    #[test]
    fn fees_are_outputs_above_subsidy() {
        let tx = coinbase("00", json!([{"value": 50.0, "n": 0}, {"value": 0.00125, "n": 1}]));
        let fees = block_total_fees(&tx, 10, &CoinParams::veil(), Network::Main);
        assert_eq!(fees, BigDecimal::from_str("0.00125").unwrap());
    }

    #[test]
    fn fees_never_go_negative() {
        let tx = coinbase("00", json!([{"value": 10.0, "n": 0}]));
        let fees = block_total_fees(&tx, 10, &CoinParams::veil(), Network::Main);
        assert_eq!(fees, BigDecimal::zero());
    }

    #[test]
    fn confidential_outputs_are_ignored() {
        let tx = coinbase("00", json!([{"n": 0, "type": "ringct"}, {"value": 50.5, "n": 1}]));
        let fees = block_total_fees(&tx, 0, &CoinParams::veil(), Network::Main);
        assert_eq!(fees, BigDecimal::from_str("0.5").unwrap());
    }

    #[test]
    fn miner_found_by_coinbase_tag() {
        let script = hex::encode(b"\x03\x01\x02/tagpool/");
        let tx = coinbase(&script, json!([{"value": 50.0, "n": 0}]));
        let pools = pools();
        assert_eq!(identify_miner(&tx, &pools).unwrap().name, "Tagged Pool");
    }

    #[test]
    fn miner_found_by_payout_address() {
        let tx = coinbase(
            "0101",
            json!([{"value": 50.0, "n": 0, "scriptPubKey": {"addresses": ["VpayoutAddr"]}}]),
        );
        let pools = pools();
        assert_eq!(identify_miner(&tx, &pools).unwrap().name, "Address Pool");
    }

    #[test]
    fn unknown_miner() {
        let tx = coinbase("zz-not-hex", json!([{"value": 50.0, "n": 0}]));
        assert!(identify_miner(&tx, &pools()).is_none());
    }
}
