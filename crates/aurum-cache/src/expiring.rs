//! Values with a time-to-live.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cached value and the window in which it is fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expiring<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<T> Expiring<T> {
    pub fn new(value: T, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            value,
            stored_at: now,
            expires_at: now + ttl,
        }
    }

    /// Fresh until (excluding) `expires_at`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left before expiry, zero once stale.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_window() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let entry = Expiring::new("x", Duration::seconds(300), now);

        assert!(entry.is_fresh_at(now));
        assert!(entry.is_fresh_at(now + Duration::seconds(299)));
        assert!(!entry.is_fresh_at(now + Duration::seconds(300)));
        assert_eq!(entry.remaining_at(now + Duration::seconds(100)), Duration::seconds(200));
        assert_eq!(entry.remaining_at(now + Duration::seconds(900)), Duration::zero());
    }
}
