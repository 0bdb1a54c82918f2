//! Operation counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for container operations using atomic counters
#[derive(Debug, Default)]
pub struct LinearStats {
    pub pushes: AtomicU64,
    pub replacements: AtomicU64,
    pub updates: AtomicU64,
    pub removals: AtomicU64,
    pub evictions: AtomicU64,
    pub rejections: AtomicU64,
    pub read_hits: AtomicU64,
    pub read_misses: AtomicU64,
}

impl LinearStats {
    /// Get a snapshot of current statistics
    pub fn snapshot(&self) -> LinearStatsSnapshot {
        LinearStatsSnapshot {
            pushes: self.pushes.load(Ordering::Relaxed),
            replacements: self.replacements.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            read_hits: self.read_hits.load(Ordering::Relaxed),
            read_misses: self.read_misses.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of container statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearStatsSnapshot {
    /// Pushes that inserted a new key
    pub pushes: u64,
    /// Pushes that replaced the value of an existing key
    pub replacements: u64,
    pub updates: u64,
    /// Entries removed by pop, take or get
    pub removals: u64,
    /// Entries dropped to admit a push
    pub evictions: u64,
    /// Writes refused for lack of capacity
    pub rejections: u64,
    pub read_hits: u64,
    pub read_misses: u64,
}

impl LinearStatsSnapshot {
    /// Fraction of reads that found their key, or `None` before any read
    pub fn read_hit_ratio(&self) -> Option<f64> {
        let total = self.read_hits + self.read_misses;
        (total > 0).then(|| self.read_hits as f64 / total as f64)
    }
}
