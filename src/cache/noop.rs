// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! No-operation cache that disables caching entirely

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{CacheBackend, CacheKey, CacheStats};
use crate::errors::CacheError;

/// A cache that always misses and ignores writes
///
/// Installed in every pool when in-process RPC caching is switched off, so
/// every lookup goes to the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl CacheBackend for NoOpCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: Value, _max_age: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "NoOpCache"
    }
}
