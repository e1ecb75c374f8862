// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for node RPC operations.
//!
//! These errors are produced by [`NodeRpc`](crate::rpc::NodeRpc) implementations
//! and propagated unchanged through every aggregation in [`CoreApi`](crate::CoreApi).
//! The aggregation layer never retries and never reinterprets node error payloads.

/// Node error code returned for unknown transactions, blocks and addresses.
pub const RPC_INVALID_ADDRESS_OR_KEY: i64 = -5;

/// Errors that can occur while calling the full node.
///
/// # Examples
///
/// ```rust
/// use explorer_core::RpcError;
///
/// let error = RpcError::Node {
///     method: "getblock".to_string(),
///     code: -5,
///     message: "Block not found".to_string(),
/// };
/// assert!(error.is_not_found());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request never produced a response (connection refused, HTTP failure).
    ///
    /// These are the only errors the client-side retry layer retries.
    #[error("Transport failure during {method}")]
    Transport {
        /// RPC method being called
        method: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("Node rejected {method} (code {code}): {message}")]
    Node {
        /// RPC method being called
        method: String,
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// The node's response could not be decoded into the expected shape.
    #[error("Failed to decode {method} response")]
    Decode {
        /// RPC method being called
        method: String,
        /// The underlying decode error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request exceeded the configured client timeout.
    #[error("Timed out waiting for {method}")]
    Timeout {
        /// RPC method being called
        method: String,
    },
}

impl RpcError {
    /// Helper to create a `Transport` error from any error type.
    pub fn transport(
        method: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::Transport {
            method: method.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `Node` error.
    pub fn node(method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        RpcError::Node {
            method: method.into(),
            code,
            message: message.into(),
        }
    }

    /// Helper to create a `Decode` error from any error type.
    pub fn decode(
        method: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::Decode {
            method: method.into(),
            source: Box::new(source),
        }
    }

    /// The RPC method the error belongs to.
    pub fn method(&self) -> &str {
        match self {
            RpcError::Transport { method, .. }
            | RpcError::Node { method, .. }
            | RpcError::Decode { method, .. }
            | RpcError::Timeout { method } => method,
        }
    }

    /// Whether the node reported the requested object as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RpcError::Node { code, .. } if *code == RPC_INVALID_ADDRESS_OR_KEY)
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Node error responses are deterministic and are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RpcError::Transport { .. } | RpcError::Timeout { .. })
    }
}
