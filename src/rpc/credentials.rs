// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Node RPC credential resolution.

use std::path::Path;

use tracing::debug;

use crate::config::RpcConfig;
use crate::errors::ExplorerError;
use crate::transport::BasicAuth;

/// Username/password pair for the node's basic auth
#[derive(Clone, PartialEq, Eq)]
pub struct RpcCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RpcCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RpcCredentials {
    /// Explicit username/password win; otherwise the cookie file is read.
    ///
    /// Resolves `Ok(None)` when neither is available, leaving the request
    /// unauthenticated.
    pub fn resolve(config: &RpcConfig) -> Result<Option<Self>, ExplorerError> {
        if let Some(username) = &config.username {
            return Ok(Some(Self {
                username: username.clone(),
                password: config.password.clone().unwrap_or_default(),
            }));
        }

        match &config.cookie_path {
            Some(path) if path.exists() => Self::from_cookie_file(path).map(Some),
            Some(path) => {
                debug!(path = %path.display(), "No RPC cookie file; connecting without credentials");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Reads a node cookie file containing a single `user:password` line.
    pub fn from_cookie_file(path: &Path) -> Result<Self, ExplorerError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::config(format!("reading cookie {}: {e}", path.display()))
        })?;

        let line = contents.lines().next().unwrap_or_default().trim();
        let (username, password) = line.split_once(':').ok_or_else(|| {
            ExplorerError::config(format!(
                "cookie {} is not in user:password form",
                path.display()
            ))
        })?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl From<RpcCredentials> for BasicAuth {
    fn from(credentials: RpcCredentials) -> Self {
        BasicAuth {
            username: credentials.username,
            password: Some(credentials.password),
        }
    }
}
