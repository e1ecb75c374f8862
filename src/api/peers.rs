// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Connected-peer summary grouped by user agent and service flags.

use std::collections::HashMap;

use serde::Serialize;
use tracing::Instrument;

use super::CoreApi;
use crate::errors::ExplorerError;
use crate::rpc::{NodeRpc, PeerInfo};
use crate::spans;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSummary {
    #[serde(rename = "getpeerinfo")]
    pub peers: Vec<PeerInfo>,
    /// `(subver, peer count)`, most common first
    pub version_summary: Vec<(String, usize)>,
    /// `(services, peer count)`, most common first
    pub services_summary: Vec<(String, usize)>,
}

/// Counts occurrences of each key, most common first, ties in ascending key order.
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut grouped: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    grouped.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    grouped
}

pub fn summarize_peers(peers: Vec<PeerInfo>) -> PeerSummary {
    let version_summary = count_by(peers.iter().map(|peer| peer.subver.as_str()));
    let services_summary = count_by(peers.iter().map(|peer| peer.services.as_str()));
    PeerSummary {
        peers,
        version_summary,
        services_summary,
    }
}

impl<R: NodeRpc> CoreApi<R> {
    pub async fn get_peer_summary(&self) -> Result<PeerSummary, ExplorerError> {
        let peers = self
            .get_peer_info()
            .instrument(spans::get_peer_summary())
            .await?;
        Ok(summarize_peers(peers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn peer(subver: &str, services: &str) -> PeerInfo {
        serde_json::from_value(json!({"id": 0, "addr": "1.2.3.4:58810", "subver": subver, "services": services}))
            .unwrap()
    }

    #[test]
    fn groups_sort_by_count_then_key() {
        let summary = summarize_peers(vec![
            peer("/Veil:1.1.0/", "0000000000000409"),
            peer("/Veil:1.0.4/", "0000000000000409"),
            peer("/Veil:1.1.0/", "000000000000040d"),
            peer("/Veil:1.0.2/", "0000000000000409"),
        ]);

        assert_eq!(
            summary.version_summary,
            vec![
                ("/Veil:1.1.0/".to_string(), 2),
                ("/Veil:1.0.2/".to_string(), 1),
                ("/Veil:1.0.4/".to_string(), 1),
            ]
        );
        assert_eq!(
            summary.services_summary,
            vec![
                ("0000000000000409".to_string(), 3),
                ("000000000000040d".to_string(), 1),
            ]
        );
        assert_eq!(summary.peers.len(), 4);
    }

    #[test]
    fn every_peer_is_counted_once() {
        let summary = summarize_peers(vec![peer("a", "1"), peer("a", "1")]);
        assert_eq!(summary.version_summary, vec![("a".to_string(), 2)]);
        assert_eq!(summary.services_summary, vec![("1".to_string(), 2)]);
    }
}
