// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for cache entry metadata
//!
//! - [`TimestampMillis`]: Unix timestamp in milliseconds for entry age and LRU ordering
//! - [`AccessSequence`]: Monotonic sequence number breaking LRU ties

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds
///
/// # Examples
///
/// ```
/// use explorer_core::cache::TimestampMillis;
/// use std::time::Duration;
///
/// let ts = TimestampMillis::now();
/// std::thread::sleep(Duration::from_millis(10));
/// assert!(ts.is_older_than(Duration::from_millis(5)));
/// assert!(!ts.is_older_than(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimestampMillis(u128);

impl TimestampMillis {
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(millis)
    }

    #[cfg(test)]
    pub(crate) fn from_millis(millis: u128) -> Self {
        Self(millis)
    }

    /// Time elapsed since this timestamp; zero if it lies in the future.
    pub fn age_since_now(&self) -> Duration {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let age_millis = now_millis.saturating_sub(self.0);
        Duration::from_millis(age_millis as u64)
    }

    pub fn is_older_than(&self, duration: Duration) -> bool {
        self.age_since_now() > duration
    }
}

impl Default for TimestampMillis {
    fn default() -> Self {
        Self::now()
    }
}

/// Monotonic sequence number for deterministic LRU ordering
///
/// Entries touched within the same millisecond are ordered by sequence;
/// lower is older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AccessSequence(u64);

impl AccessSequence {
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_millis() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis()
    }

    #[test]
    fn timestamp_age_of_past_instant() {
        let past = TimestampMillis::from_millis(now_millis() - 5000);
        let age = past.age_since_now();
        assert!(age >= Duration::from_millis(5000));
        assert!(age < Duration::from_millis(6000));
        assert!(past.is_older_than(Duration::from_millis(4000)));
        assert!(!past.is_older_than(Duration::from_millis(6000)));
    }

    #[test]
    fn timestamp_in_future_has_zero_age() {
        let future = TimestampMillis::from_millis(now_millis() + 5000);
        assert_eq!(future.age_since_now(), Duration::ZERO);
    }

    #[test]
    fn access_sequence_saturates() {
        assert!(AccessSequence(1) < AccessSequence(1).next());
        assert_eq!(AccessSequence(u64::MAX).next(), AccessSequence(u64::MAX));
    }
}
