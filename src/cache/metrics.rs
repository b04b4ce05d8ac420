//! Cache Metrics Collection
//!
//! Counters for monitoring how often the cache is rebuilt and queried.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cache metrics collector
#[derive(Debug, Default)]
pub struct CacheMetrics {
    // Populate metrics
    populate_runs: AtomicU64,
    populate_noops: AtomicU64,
    forced_refreshes: AtomicU64,
    entities_indexed: AtomicU64,
    entities_skipped: AtomicU64,

    // Lifecycle metrics
    clears: AtomicU64,
    invalidations: AtomicU64,

    // Query metrics
    queries: AtomicU64,
    id_hits: AtomicU64,
    id_misses: AtomicU64,
}

impl CacheMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_populate(&self, forced: bool, noop: bool, indexed: usize, skipped: usize) {
        self.populate_runs.fetch_add(1, Ordering::Relaxed);
        if noop {
            self.populate_noops.fetch_add(1, Ordering::Relaxed);
        }
        if forced {
            self.forced_refreshes.fetch_add(1, Ordering::Relaxed);
        }
        self.entities_indexed
            .fetch_add(indexed as u64, Ordering::Relaxed);
        self.entities_skipped
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_id_lookups(&self, hits: usize, misses: usize) {
        self.id_hits.fetch_add(hits as u64, Ordering::Relaxed);
        self.id_misses.fetch_add(misses as u64, Ordering::Relaxed);
    }

    pub fn populate_runs(&self) -> u64 {
        self.populate_runs.load(Ordering::Relaxed)
    }

    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Fraction of requested ids that were cached
    pub fn id_hit_ratio(&self) -> f64 {
        let hits = self.id_hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.id_misses.load(Ordering::Relaxed) as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.populate_runs,
            &self.populate_noops,
            &self.forced_refreshes,
            &self.entities_indexed,
            &self.entities_skipped,
            &self.clears,
            &self.invalidations,
            &self.queries,
            &self.id_hits,
            &self.id_misses,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            populate_runs: self.populate_runs(),
            populate_noops: self.populate_noops.load(Ordering::Relaxed),
            forced_refreshes: self.forced_refreshes.load(Ordering::Relaxed),
            entities_indexed: self.entities_indexed.load(Ordering::Relaxed),
            entities_skipped: self.entities_skipped.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            queries: self.queries(),
            id_hits: self.id_hits.load(Ordering::Relaxed),
            id_misses: self.id_misses.load(Ordering::Relaxed),
            id_hit_ratio: self.id_hit_ratio(),
        }
    }
}

/// Snapshot of cache metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub populate_runs: u64,
    pub populate_noops: u64,
    pub forced_refreshes: u64,
    pub entities_indexed: u64,
    pub entities_skipped: u64,
    pub clears: u64,
    pub invalidations: u64,
    pub queries: u64,
    pub id_hits: u64,
    pub id_misses: u64,
    pub id_hit_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_counters() {
        let metrics = CacheMetrics::new();
        metrics.record_populate(false, false, 10, 2);
        metrics.record_populate(true, false, 5, 0);
        metrics.record_populate(false, true, 0, 0);

        let snap = metrics.snapshot();
        assert_eq!(snap.populate_runs, 3);
        assert_eq!(snap.populate_noops, 1);
        assert_eq!(snap.forced_refreshes, 1);
        assert_eq!(snap.entities_indexed, 15);
        assert_eq!(snap.entities_skipped, 2);
    }

    #[test]
    fn test_id_hit_ratio() {
        let metrics = CacheMetrics::new();
        assert_eq!(metrics.id_hit_ratio(), 0.0);

        metrics.record_id_lookups(3, 1);
        assert_eq!(metrics.id_hit_ratio(), 0.75);
    }

    #[test]
    fn test_reset() {
        let metrics = CacheMetrics::new();
        metrics.record_query();
        metrics.record_clear();
        metrics.record_invalidation();
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
