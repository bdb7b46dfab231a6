//! Search telemetry. A [PathFinder](crate::PathFinder) reports to an optional
//! [SearchMetrics] collaborator; without one nothing is recorded.
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Identifier under which the instruments below are exported.
pub const METER_NAME: &str = "terrain_pathfinding.path_finder";
pub const CURRENT_SEARCHES: &str = "current_searches";
pub const COMPLETED_SEARCHES: &str = "completed_searches";
pub const FAILED_SEARCHES: &str = "failed_searches";
pub const COMPLETED_SEARCH_DURATION: &str = "completed_search_duration";
pub const FAILED_SEARCH_DURATION: &str = "failed_search_duration";

/// Upper bounds in microseconds of the duration histogram buckets. Durations above the
/// last bound land in an overflow bucket.
pub const DURATION_BUCKETS_MICROS: [u64; 9] = [10, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000];

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

pub trait SearchMetrics: Send + Sync {
    fn search_started(&self);
    fn search_finished(&self, succeeded: bool, elapsed: Duration);
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetrics;

impl SearchMetrics for NoopMetrics {
    fn search_started(&self) {}
    fn search_finished(&self, _: bool, _: Duration) {}
}

#[derive(Debug)]
pub struct DurationHistogram {
    buckets: [AtomicU64; DURATION_BUCKETS_MICROS.len() + 1],
    count: AtomicU64,
    sum_micros: AtomicU64,
}

impl Default for DurationHistogram {
    fn default() -> DurationHistogram {
        DurationHistogram {
            buckets: Default::default(),
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
        }
    }
}

impl DurationHistogram {
    pub fn record(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let bucket = DURATION_BUCKETS_MICROS
            .iter()
            .position(|&bound| micros <= bound)
            .unwrap_or(DURATION_BUCKETS_MICROS.len());
        self.buckets[bucket].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
    }
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
    pub fn sum_micros(&self) -> u64 {
        self.sum_micros.load(Ordering::Relaxed)
    }
    /// Per-bucket counts, the overflow bucket last.
    pub fn bucket_counts(&self) -> Vec<u64> {
        self.buckets
            .iter()
            .map(|bucket| bucket.load(Ordering::Relaxed))
            .collect()
    }

    fn write_into(&self, name: &str, snapshot: &mut FxIndexMap<String, u64>) {
        snapshot.insert(format!("{}.count", name), self.count());
        snapshot.insert(format!("{}.sum_us", name), self.sum_micros());
        for (bound, count) in DURATION_BUCKETS_MICROS.iter().zip(self.bucket_counts()) {
            snapshot.insert(format!("{}.le_{}us", name, bound), count);
        }
        snapshot.insert(
            format!("{}.le_inf", name),
            self.buckets[DURATION_BUCKETS_MICROS.len()].load(Ordering::Relaxed),
        );
    }
}

/// Lock-free in-process recorder, meant to be shared by every finder of a server and
/// read by whatever exports metrics.
#[derive(Debug, Default)]
pub struct PathFinderMetrics {
    current_searches: AtomicI64,
    completed_searches: AtomicU64,
    failed_searches: AtomicU64,
    completed_duration: DurationHistogram,
    failed_duration: DurationHistogram,
}

impl PathFinderMetrics {
    pub fn new() -> PathFinderMetrics {
        PathFinderMetrics::default()
    }
    pub fn current_searches(&self) -> i64 {
        self.current_searches.load(Ordering::Relaxed)
    }
    pub fn completed_searches(&self) -> u64 {
        self.completed_searches.load(Ordering::Relaxed)
    }
    pub fn failed_searches(&self) -> u64 {
        self.failed_searches.load(Ordering::Relaxed)
    }
    pub fn completed_duration(&self) -> &DurationHistogram {
        &self.completed_duration
    }
    pub fn failed_duration(&self) -> &DurationHistogram {
        &self.failed_duration
    }

    /// All instruments by name, in a stable order.
    pub fn snapshot(&self) -> FxIndexMap<String, u64> {
        let mut snapshot = FxIndexMap::default();
        snapshot.insert(
            CURRENT_SEARCHES.to_owned(),
            self.current_searches().max(0) as u64,
        );
        snapshot.insert(COMPLETED_SEARCHES.to_owned(), self.completed_searches());
        snapshot.insert(FAILED_SEARCHES.to_owned(), self.failed_searches());
        self.completed_duration
            .write_into(COMPLETED_SEARCH_DURATION, &mut snapshot);
        self.failed_duration
            .write_into(FAILED_SEARCH_DURATION, &mut snapshot);
        snapshot
    }
}

impl SearchMetrics for PathFinderMetrics {
    fn search_started(&self) {
        self.current_searches.fetch_add(1, Ordering::Relaxed);
    }

    fn search_finished(&self, succeeded: bool, elapsed: Duration) {
        self.current_searches.fetch_sub(1, Ordering::Relaxed);
        if succeeded {
            self.completed_searches.fetch_add(1, Ordering::Relaxed);
            self.completed_duration.record(elapsed);
        } else {
            self.failed_searches.fetch_add(1, Ordering::Relaxed);
            self.failed_duration.record(elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_started_and_finished_searches() {
        let metrics = PathFinderMetrics::new();
        metrics.search_started();
        metrics.search_started();
        assert_eq!(metrics.current_searches(), 2);
        metrics.search_finished(true, Duration::from_micros(40));
        metrics.search_finished(false, Duration::from_millis(20));
        assert_eq!(metrics.current_searches(), 0);
        assert_eq!(metrics.completed_searches(), 1);
        assert_eq!(metrics.failed_searches(), 1);
        assert_eq!(metrics.completed_duration().count(), 1);
        assert_eq!(metrics.completed_duration().sum_micros(), 40);
        assert_eq!(metrics.completed_duration().bucket_counts()[1], 1);
        assert_eq!(metrics.failed_duration().bucket_counts()[9], 1);
    }

    #[test]
    fn snapshot_keeps_instrument_order() {
        let metrics = PathFinderMetrics::new();
        metrics.search_started();
        metrics.search_finished(true, Duration::from_micros(5));
        let snapshot = metrics.snapshot();
        let names: Vec<&str> = snapshot.keys().take(5).map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                CURRENT_SEARCHES,
                COMPLETED_SEARCHES,
                FAILED_SEARCHES,
                "completed_search_duration.count",
                "completed_search_duration.sum_us",
            ]
        );
        assert_eq!(snapshot["completed_search_duration.le_10us"], 1);
        assert_eq!(snapshot["failed_search_duration.le_inf"], 0);
        assert_eq!(snapshot.len(), 3 + 2 * (2 + DURATION_BUCKETS_MICROS.len() + 1));
    }

    #[test]
    fn noop_is_usable_as_trait_object() {
        let metrics: &dyn SearchMetrics = &NoopMetrics;
        metrics.search_started();
        metrics.search_finished(false, Duration::ZERO);
    }
}
