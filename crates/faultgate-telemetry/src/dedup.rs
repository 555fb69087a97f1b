//! At-most-once reporting per logical failure
//!
//! Keys are never removed; the cache lives as long as the gateway.

use dashmap::DashSet;
use faultgate_core::domain::DedupKey;

/// Set of failures already reported by this process
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: DashSet<DedupKey>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`, returning `true` only the first time it is seen.
    ///
    /// Check and insert are a single atomic step.
    pub fn record(&self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }
}
