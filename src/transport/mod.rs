// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer for the node JSON-RPC client.
//!
//! The client is a Tower stack built from the inside out:
//!
//! ```text
//! LoggingLayer -> RetryLayer -> HttpTransport
//! ```
//!
//! [`HttpTransport`] posts a single JSON-RPC 1.0 request, [`RetryLayer`] backs
//! off on transport failures, and [`LoggingLayer`] wraps each call in a
//! `tracing` span with timing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use explorer_core::transport::{HttpTransport, LoggingLayer, RetryLayer};
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(LoggingLayer::new())
//!     .layer(RetryLayer::new())
//!     .service(HttpTransport::new(url, None, Duration::from_secs(5))?);
//! ```

mod http;
mod logging;
mod retry;

pub use http::{BasicAuth, HttpTransport, RpcRequest};
pub use logging::{LoggingLayer, LoggingService};
pub use retry::{RetryConfig, RetryLayer, RetryLayerBuilder, RetryService};
