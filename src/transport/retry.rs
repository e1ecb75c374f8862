// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower layer that retries transport failures of node RPC calls.
//!
//! A node error response (`{"error": {...}}`) is an answer, not a failure of
//! the connection, and is returned immediately. Only [`RpcError::Transport`]
//! and [`RpcError::Timeout`] are retried, with exponential backoff.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use serde_json::Value;
use tower::Layer;
use tracing::{debug, warn};

use super::RpcRequest;
use crate::errors::RpcError;

/// Backoff policy for [`RetryLayer`].
///
/// The wait before retry `n` (zero-based) is `min(base_delay * 2^n, max_delay)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Wait before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Wraps a node transport in [`RetryService`].
///
/// ```rust
/// use explorer_core::transport::RetryLayer;
/// use std::time::Duration;
///
/// let layer = RetryLayer::builder()
///     .max_retries(4)
///     .base_delay(Duration::from_millis(250))
///     .build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetryLayer {
    config: Arc<RetryConfig>,
}

impl RetryLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: RetryConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn builder() -> RetryLayerBuilder {
        RetryLayerBuilder::default()
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RetryService {
            service,
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RetryLayerBuilder {
    config: RetryConfig,
}

impl RetryLayerBuilder {
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    pub fn build(self) -> RetryLayer {
        RetryLayer::from_config(self.config)
    }
}

#[derive(Clone, Debug)]
pub struct RetryService<S> {
    service: S,
    config: Arc<RetryConfig>,
}

impl<S> tower::Service<RpcRequest> for RetryService<S>
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
        let service = self.service.clone();
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let mut retry = 0u32;
            loop {
                let error = match service.clone().call(request.clone()).await {
                    Ok(response) => {
                        if retry > 0 {
                            debug!(method = %request.method, retries = retry, "Node call recovered");
                        }
                        return Ok(response);
                    }
                    Err(error) if !error.is_retryable() => return Err(error),
                    Err(error) => error,
                };

                if retry >= config.max_retries {
                    warn!(
                        method = %request.method,
                        attempts = retry + 1,
                        error = %error,
                        "Giving up on node call"
                    );
                    return Err(error);
                }

                let delay = config.delay_for(retry);
                debug!(
                    method = %request.method,
                    retry = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Retrying node call"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
        })
    }
}
