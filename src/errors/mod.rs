// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the explorer data-access layer.
//!
//! The taxonomy follows how failures are treated:
//!
//! - [`CacheError`] - backend lookup/store failures. Logged and swallowed by the
//!   cache-or-fetch primitive, never surfaced to callers.
//! - [`RpcError`] - node or transport failures. Propagated to the caller as-is.
//! - [`ExplorerError`] - what every [`CoreApi`](crate::CoreApi) operation returns:
//!   wraps [`RpcError`] and adds precondition failures (invalid ranges or
//!   arguments) and missing objects.
//!
//! Partial input resolution is not an error: unresolvable previous transactions
//! are simply absent from the resulting input map.
//!
//! # Examples
//!
//! ```rust,ignore
//! use explorer_core::{BlockRef, ExplorerError};
//!
//! match api.get_tx_count_stats(5, BlockRef::Height(100), BlockRef::Height(50)).await {
//!     Ok(stats) => println!("{} points", stats.tx_count_stats.tx_counts.len()),
//!     Err(ExplorerError::InvalidRange { reason }) => eprintln!("bad range: {reason}"),
//!     Err(ExplorerError::Rpc(e)) => eprintln!("node failure: {e}"),
//!     Err(e) => eprintln!("other: {e}"),
//! }
//! ```

mod cache;
mod rpc;

pub use cache::CacheError;
pub use rpc::{RpcError, RPC_INVALID_ADDRESS_OR_KEY};

/// Unified error type for all explorer operations.
///
/// [`RpcError`] converts automatically via `From`, so node calls compose with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Node or transport failure.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// A requested block range is inverted or otherwise unusable.
    #[error("Invalid block range: {reason}")]
    InvalidRange {
        /// Description of why the range is invalid
        reason: String,
    },

    /// An argument is outside the accepted domain.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the offending argument
        reason: String,
    },

    /// An explicitly requested object does not exist on the node.
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up, e.g. `transaction abcd...`
        what: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {reason}")]
    Config {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl ExplorerError {
    /// Create an `InvalidRange` error with a reason.
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        ExplorerError::InvalidRange {
            reason: reason.into(),
        }
    }

    /// Create an `InvalidArgument` error with a reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        ExplorerError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        ExplorerError::NotFound { what: what.into() }
    }

    /// Helper for a missing transaction.
    pub fn missing_transaction(txid: &str) -> Self {
        Self::not_found(format!("transaction {txid}"))
    }

    /// Create a `Config` error.
    pub fn config(reason: impl Into<String>) -> Self {
        ExplorerError::Config {
            reason: reason.into(),
        }
    }
}
