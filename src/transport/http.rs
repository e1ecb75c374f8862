// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC 1.0 over HTTP, as spoken by bitcoind-derived nodes.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::errors::RpcError;

/// A single JSON-RPC call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "1.0",
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Basic-auth pair sent with every request.
#[derive(Clone, Debug)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug)]
struct HttpTransportInner {
    client: reqwest::Client,
    url: Url,
    auth: Option<BasicAuth>,
}

/// Innermost Tower service: posts one request and decodes the envelope.
///
/// Resolves with the raw `result` value; a non-null `error` object becomes
/// [`RpcError::Node`].
#[derive(Clone, Debug)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

impl HttpTransport {
    /// Build a transport with a per-request timeout.
    pub fn new(
        url: Url,
        auth: Option<BasicAuth>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(HttpTransportInner { client, url, auth }),
        })
    }

    pub fn url(&self) -> &Url {
        &self.inner.url
    }
}

impl tower::Service<RpcRequest> for HttpTransport {
    type Response = Value;
    type Error = RpcError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RpcRequest) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let method = request.method.clone();
            let mut builder = inner.client.post(inner.url.clone()).json(&request);
            if let Some(auth) = &inner.auth {
                builder = builder.basic_auth(&auth.username, auth.password.as_ref());
            }

            let response = builder.send().await.map_err(|e| classify(&method, e))?;
            let status = response.status();
            let body = response.bytes().await.map_err(|e| classify(&method, e))?;

            // bitcoind reports node errors with HTTP 500/404 and a JSON body
            let envelope: RpcEnvelope = match serde_json::from_slice(&body) {
                Ok(envelope) => envelope,
                Err(e) if status.is_success() => return Err(RpcError::decode(&method, e)),
                Err(_) => {
                    return Err(RpcError::transport(
                        &method,
                        std::io::Error::other(format!("HTTP {status} without JSON-RPC body")),
                    ))
                }
            };

            if let Some(error) = envelope.error {
                return Err(RpcError::node(method, error.code, error.message));
            }

            Ok(envelope.result)
        })
    }
}

fn classify(method: &str, error: reqwest::Error) -> RpcError {
    if error.is_timeout() {
        RpcError::Timeout {
            method: method.to_string(),
        }
    } else {
        RpcError::transport(method, error)
    }
}
