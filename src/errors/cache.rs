// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for cache backends.
//!
//! A [`CacheError`] never reaches callers of [`CoreApi`](crate::CoreApi): the
//! cache-or-fetch primitive logs it with the correlating key and treats the
//! lookup as a miss.

/// Errors raised by a [`CacheBackend`](crate::cache::CacheBackend).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend itself failed (connection lost, command rejected).
    #[error("{backend} cache failure: {details}")]
    Backend {
        /// Backend name, e.g. `RedisCache`
        backend: &'static str,
        /// What was being attempted
        details: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored value could not be encoded or decoded.
    #[error("Cached value for {key} could not be (de)serialized")]
    Serialization {
        /// Cache key of the offending entry
        key: String,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Create a `Backend` error with an optional source.
    pub fn backend(
        backend: &'static str,
        details: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CacheError::Backend {
            backend,
            details: details.into(),
            source,
        }
    }

    /// Create a `Serialization` error for a key.
    pub fn serialization(key: impl Into<String>, source: serde_json::Error) -> Self {
        CacheError::Serialization {
            key: key.into(),
            source,
        }
    }
}
