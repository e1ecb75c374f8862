// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Coin parameters: fee buckets, reward schedule, genesis data and known pools.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::errors::ExplorerError;

/// Number of reward eras before the subsidy is treated as zero
const REWARD_ERAS: u64 = 34;

/// Node network the explorer is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
    Dev,
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Dev => "dev",
            Network::Regtest => "regtest",
        })
    }
}

impl FromStr for Network {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            "dev" | "devnet" => Ok(Network::Dev),
            "regtest" => Ok(Network::Regtest),
            other => Err(ExplorerError::config(format!("unknown network '{other}'"))),
        }
    }
}

/// One value per network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerNetwork<T> {
    pub main: T,
    pub test: T,
    pub dev: T,
    pub regtest: T,
}

impl<T> PerNetwork<T> {
    pub fn get(&self, network: Network) -> &T {
        match network {
            Network::Main => &self.main,
            Network::Test => &self.test,
            Network::Dev => &self.dev,
            Network::Regtest => &self.regtest,
        }
    }
}

/// A mining pool recognizable from its coinbase transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningPool {
    pub name: String,
    /// Text the pool embeds in its coinbase script
    #[serde(default)]
    pub tags: Vec<String>,
    /// Addresses the pool pays its block rewards to
    #[serde(default)]
    pub payout_addresses: Vec<String>,
}

/// Static description of the coin served by the explorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinParams {
    pub name: String,
    pub ticker: String,
    /// Ascending upper bounds (sat/byte) of the mempool fee-rate buckets
    pub fee_satoshi_per_byte_bucket_maxima: Vec<f64>,
    /// Subsidy of the first reward era, in whole coins
    pub initial_block_reward: BigDecimal,
    /// Blocks per reward era
    pub halving_interval: PerNetwork<u64>,
    pub genesis_block_hashes: PerNetwork<String>,
    pub genesis_coinbase_txids: PerNetwork<String>,
    #[serde(default)]
    pub mining_pools: Vec<MiningPool>,
}

impl CoinParams {
    /// Veil mainnet/testnet parameters.
    pub fn veil() -> Self {
        Self {
            name: "Veil".to_string(),
            ticker: "Veil".to_string(),
            fee_satoshi_per_byte_bucket_maxima: vec![
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 15.0, 20.0, 25.0, 50.0, 75.0,
                100.0, 150.0,
            ],
            initial_block_reward: BigDecimal::from(50),
            halving_interval: PerNetwork {
                main: 518_400,
                test: 518_400,
                dev: 518_400,
                regtest: 150,
            },
            genesis_block_hashes: PerNetwork {
                main: "cd98c436136a211f982543eb5e21ea6e9fa483eae3852a70ff1a29efac8455f9".into(),
                test: "918ebe520f7666375d7e4dbb0c269f675440b96b0413ab92bbf28b85126197cd".into(),
                dev: "8caf05f423873ae32ad655c6003053583789b42ce532cfcdb065a2e8769ad23a".into(),
                regtest: "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206"
                    .into(),
            },
            genesis_coinbase_txids: PerNetwork {
                main: "6e674dee375335f275a9ebe7f89ba731e2d818d41897da8250e853ceb8241b79".into(),
                test: "503e28252d0111000dadec7bd60f8540102b9e2f337d1782d6a755276ba5a45b".into(),
                dev: "1f2bf6e3366b9670494792869eb557da4519590fdd23bf87efccdaa08716f573".into(),
                regtest: "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
                    .into(),
            },
            mining_pools: Vec::new(),
        }
    }

    /// Block subsidy at `height`, halving every era and zero after the last.
    ///
    /// ```
    /// use bigdecimal::BigDecimal;
    /// use explorer_core::{CoinParams, Network};
    ///
    /// let veil = CoinParams::veil();
    /// assert_eq!(veil.block_reward(0, Network::Main), BigDecimal::from(50));
    /// assert_eq!(veil.block_reward(150, Network::Regtest), BigDecimal::from(25));
    /// ```
    pub fn block_reward(&self, height: u64, network: Network) -> BigDecimal {
        let interval = (*self.halving_interval.get(network)).max(1);
        let era = height / interval;
        if era >= REWARD_ERAS {
            return BigDecimal::from(0);
        }

        let divisor = BigDecimal::from(1u64 << era);
        (&self.initial_block_reward / &divisor).with_scale(8).normalized()
    }

    pub fn genesis_block_hash(&self, network: Network) -> &str {
        self.genesis_block_hashes.get(network)
    }

    pub fn genesis_coinbase_txid(&self, network: Network) -> &str {
        self.genesis_coinbase_txids.get(network)
    }
}

impl Default for CoinParams {
    fn default() -> Self {
        Self::veil()
    }
}
