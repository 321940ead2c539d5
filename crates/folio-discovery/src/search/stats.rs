// crates/folio-discovery/src/search/stats.rs
// Process-wide search counters

use folio_types::SearchStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters; only `reset` moves them backwards
#[derive(Debug, Default)]
pub struct StatsCounter {
    searches: AtomicU64,
    total_results: AtomicU64,
    failed_searches: AtomicU64,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One completed query and its final result count
    pub fn record_search(&self, result_count: usize) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.total_results
            .fetch_add(result_count as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            searches: self.searches.load(Ordering::Relaxed),
            total_results: self.total_results.load(Ordering::Relaxed),
            failed_searches: self.failed_searches.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.searches.store(0, Ordering::Relaxed);
        self.total_results.store(0, Ordering::Relaxed);
        self.failed_searches.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let stats = StatsCounter::new();
        stats.record_search(3);
        stats.record_search(0);
        stats.record_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.searches, 2);
        assert_eq!(snapshot.total_results, 3);
        assert_eq!(snapshot.failed_searches, 1);
    }

    #[test]
    fn test_reset() {
        let stats = StatsCounter::new();
        stats.record_search(5);
        stats.record_failure();
        stats.reset();
        assert_eq!(stats.snapshot(), SearchStats::default());
    }
}
