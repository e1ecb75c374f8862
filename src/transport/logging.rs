// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower layer that traces every node RPC call.
//!
//! Each call runs inside a `node_rpc` span with the method, request id and
//! elapsed time. Lookups the node answers with "not found" are routine for an
//! explorer (unknown txids, spent outputs) and are logged at `debug`; every
//! other failure is a `warn`.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use serde_json::Value;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

use super::RpcRequest;
use crate::errors::RpcError;

/// Adds a `node_rpc` span and outcome logging to the inner service.
///
/// # Example
///
/// ```rust,ignore
/// use explorer_core::transport::LoggingLayer;
/// use std::time::Duration;
/// use tower::Layer;
///
/// let service = LoggingLayer::new()
///     .with_slow_call_threshold(Duration::from_secs(1))
///     .layer(transport);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoggingLayer {
    slow_call: Option<Duration>,
    log_params: bool,
}

impl LoggingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls taking longer than `threshold` are logged at `warn`.
    pub fn with_slow_call_threshold(mut self, threshold: Duration) -> Self {
        self.slow_call = Some(threshold);
        self
    }

    /// Logs call parameters at `trace`.
    pub fn with_params(mut self) -> Self {
        self.log_params = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            slow_call: self.slow_call,
            log_params: self.log_params,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    slow_call: Option<Duration>,
    log_params: bool,
}

impl<S> tower::Service<RpcRequest> for LoggingService<S>
where
    S: tower::Service<RpcRequest, Response = Value, Error = RpcError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Value;
    type Error = RpcError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RpcRequest) -> Self::Future {
        let mut service = self.service.clone();
        let slow_call = self.slow_call;

        let span = tracing::debug_span!(
            "node_rpc",
            method = %request.method,
            id = request.id,
            elapsed_ms = tracing::field::Empty,
        );
        if self.log_params {
            span.in_scope(|| trace!(params = ?request.params, "Node call parameters"));
        }

        Box::pin(
            async move {
                let started = Instant::now();
                let result = service.call(request).await;
                let elapsed = started.elapsed();
                tracing::Span::current().record("elapsed_ms", elapsed.as_millis() as u64);

                match &result {
                    Ok(_) if slow_call.is_some_and(|threshold| elapsed > threshold) => {
                        warn!(elapsed_ms = elapsed.as_millis() as u64, "Slow node call");
                    }
                    Ok(_) => debug!("Node call completed"),
                    Err(error) if error.is_not_found() => {
                        debug!(error = %error, "Node reported object not found");
                    }
                    Err(error) => warn!(error = %error, "Node call failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}
