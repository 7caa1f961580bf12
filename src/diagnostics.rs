//! Optional instrumentation: operation counts, running-mean timings, and tree height.
//!
//! Mirrors `ordered_map_stats_t` and the `stats_enabled` flag from the original source.
//! Timing uses [`std::time::Instant`] rather than the original's `clock()` call, and is
//! only taken when stats are enabled so the common case pays nothing for it.

use std::time::Instant;

/// Counters and running means collected while `stats_enabled` is set on a [`crate::Map`].
///
/// `current_height` is filled in by [`crate::Map::stats`] itself, computed on demand by a
/// tree walk at snapshot time — it is never stored or updated here, so a disabled-stats map
/// still reports an accurate height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub inserts: u64,
    pub removes: u64,
    pub searches: u64,
    pub total_ops: u64,
    pub mean_insert_nanos: f64,
    pub mean_remove_nanos: f64,
    pub mean_search_nanos: f64,
    pub current_height: usize,
    pub max_height_seen: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            inserts: 0,
            removes: 0,
            searches: 0,
            total_ops: 0,
            mean_insert_nanos: 0.0,
            mean_remove_nanos: 0.0,
            mean_search_nanos: 0.0,
            current_height: 0,
            max_height_seen: 0,
        }
    }
}

impl Stats {
    pub(crate) fn record_insert(&mut self, elapsed_nanos: f64) {
        self.inserts += 1;
        self.total_ops += 1;
        self.mean_insert_nanos = running_mean(self.mean_insert_nanos, self.inserts, elapsed_nanos);
    }

    pub(crate) fn record_remove(&mut self, elapsed_nanos: f64) {
        self.removes += 1;
        self.total_ops += 1;
        self.mean_remove_nanos = running_mean(self.mean_remove_nanos, self.removes, elapsed_nanos);
    }

    pub(crate) fn record_search(&mut self, elapsed_nanos: f64) {
        self.searches += 1;
        self.total_ops += 1;
        self.mean_search_nanos = running_mean(self.mean_search_nanos, self.searches, elapsed_nanos);
    }

    /// Folds a freshly-walked height into the high-water mark; `current_height` is filled
    /// in separately by the caller at snapshot time, not here.
    pub(crate) fn record_height(&mut self, height: usize) {
        self.max_height_seen = self.max_height_seen.max(height);
    }
}

/// `mean' = (mean * (n - 1) + sample) / n`, kept as a straight port of the original's
/// incremental average rather than a numerically sturdier formulation (Welford's, say) —
/// the observable drift at large `n` is part of the ported behavior, not a bug.
fn running_mean(mean: f64, n: u64, sample: f64) -> f64 {
    let n = n as f64;
    (mean * (n - 1.0) + sample) / n
}

/// RAII-ish timer: `None` when stats are disabled, so the call site pays no
/// `Instant::now()` cost in the common case.
pub(crate) struct Timer(Option<Instant>);

impl Timer {
    pub(crate) fn start(enabled: bool) -> Self {
        Timer(if enabled { Some(Instant::now()) } else { None })
    }

    /// Elapsed nanoseconds since `start`, or `0.0` if the timer was never armed.
    pub(crate) fn elapsed_nanos(&self) -> f64 {
        match self.0 {
            Some(start) => start.elapsed().as_nanos() as f64,
            None => 0.0,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.0.is_some()
    }
}
