//! Significance filter.
//!
//! A dedup cache over derived state signatures. Noisy detectors (location,
//! resources) and the reconciliation scheduler compute a coarse signature
//! from their current state and ask the filter whether that exact derived
//! state was already reported. Signature collisions are intentional: two
//! physically different but practically-equivalent states compress to the
//! same signature and only the first is reported.
//!
//! The cache is shared between the host observation thread and the
//! reconciliation timer task, hence the concurrent map. Growth is bounded
//! by [`SignificanceFilter::clear`] (invoked on each full reconciliation)
//! and an optional per-entry max age.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Concurrent dedup cache keyed by derived-state signatures.
#[derive(Debug)]
pub struct SignificanceFilter {
    seen: DashMap<String, Instant>,
    max_age: Option<Duration>,
}

impl SignificanceFilter {
    /// Creates a filter whose entries never expire (cleared explicitly).
    pub fn new() -> Self {
        Self {
            seen: DashMap::new(),
            max_age: None,
        }
    }

    /// Creates a filter whose entries expire after `max_age`.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            seen: DashMap::new(),
            max_age: Some(max_age),
        }
    }

    /// Whether `signature` was already recorded (and is still fresh).
    ///
    /// An expired entry is removed on the way out and no longer suppresses.
    pub fn should_suppress(&self, signature: &str) -> bool {
        let Some(entry) = self.seen.get(signature) else {
            return false;
        };

        match self.max_age {
            Some(max_age) if entry.elapsed() > max_age => {
                drop(entry);
                self.seen.remove(signature);
                false
            }
            _ => true,
        }
    }

    /// Records `signature` as reported, refreshing its timestamp.
    pub fn record(&self, signature: impl Into<String>) {
        self.seen.insert(signature.into(), Instant::now());
    }

    /// Drops every recorded signature.
    pub fn clear(&self) {
        self.seen.clear();
    }

    /// Number of live signatures (expired entries included until touched).
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for SignificanceFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_signature_is_not_suppressed() {
        let filter = SignificanceFilter::new();
        assert!(!filter.should_suppress("location:3222:3218:0"));
    }

    #[test]
    fn recorded_signature_is_suppressed() {
        let filter = SignificanceFilter::new();
        filter.record("location:3222:3218:0");
        assert!(filter.should_suppress("location:3222:3218:0"));
        assert!(!filter.should_suppress("location:3223:3218:0"));
    }

    #[test]
    fn clear_forgets_everything() {
        let filter = SignificanceFilter::new();
        filter.record("a");
        filter.record("b");
        assert_eq!(filter.len(), 2);

        filter.clear();
        assert!(filter.is_empty());
        assert!(!filter.should_suppress("a"));
    }

    #[test]
    fn expired_entries_stop_suppressing() {
        let filter = SignificanceFilter::with_max_age(Duration::from_millis(10));
        filter.record("resources:10:99");
        assert!(filter.should_suppress("resources:10:99"));

        std::thread::sleep(Duration::from_millis(20));
        assert!(!filter.should_suppress("resources:10:99"));
        // The expired entry was evicted on lookup.
        assert!(filter.is_empty());
    }

    #[test]
    fn record_refreshes_timestamp() {
        let filter = SignificanceFilter::with_max_age(Duration::from_millis(40));
        filter.record("key");
        std::thread::sleep(Duration::from_millis(25));
        filter.record("key");
        std::thread::sleep(Duration::from_millis(25));
        // 50ms since first record, 25ms since refresh: still fresh.
        assert!(filter.should_suppress("key"));
    }
}
