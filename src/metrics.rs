//! Lightweight per-engine diagnostics counters (feature `metrics`).
//!
//! Every policy core embeds an [`EngineMetrics`] block and bumps it on the
//! hot paths; embedders read a consistent [`MetricsSnapshot`] through each
//! core's `metrics_snapshot()`. Counters are plain `u64`s updated under the
//! engine's existing synchronization, so recording costs one increment.
//!
//! | Counter        | Bumped when                                        |
//! |----------------|----------------------------------------------------|
//! | `gets` / `get_hits` / `get_misses` | every `get`/`get_into` lookup  |
//! | `puts` / `put_updates` / `put_inserts` | every `put`                |
//! | `evictions`    | an entry is displaced to make room                 |
//! | `removals`     | an explicit `remove` deletes an entry              |
//! | `clears`       | `remove_all` runs                                  |
//! | `aging_passes` | LFU-Aging decays its frequencies (0 elsewhere)     |

/// Mutable counter block embedded in each policy core.
#[derive(Debug, Default, Clone)]
pub(crate) struct EngineMetrics {
    pub(crate) gets: u64,
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) puts: u64,
    pub(crate) put_updates: u64,
    pub(crate) put_inserts: u64,
    pub(crate) evictions: u64,
    pub(crate) removals: u64,
    pub(crate) clears: u64,
    pub(crate) aging_passes: u64,
}

impl EngineMetrics {
    #[inline]
    pub(crate) fn record_get_hit(&mut self) {
        self.gets += 1;
        self.get_hits += 1;
    }

    #[inline]
    pub(crate) fn record_get_miss(&mut self) {
        self.gets += 1;
        self.get_misses += 1;
    }

    #[inline]
    pub(crate) fn record_put_update(&mut self) {
        self.puts += 1;
        self.put_updates += 1;
    }

    #[inline]
    pub(crate) fn record_put_insert(&mut self) {
        self.puts += 1;
        self.put_inserts += 1;
    }

    #[inline]
    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    #[inline]
    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    #[inline]
    pub(crate) fn record_clear(&mut self) {
        self.clears += 1;
    }

    #[inline]
    pub(crate) fn record_aging_pass(&mut self) {
        self.aging_passes += 1;
    }

    pub(crate) fn snapshot(&self, len: usize, capacity: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            gets: self.gets,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            puts: self.puts,
            put_updates: self.put_updates,
            put_inserts: self.put_inserts,
            evictions: self.evictions,
            removals: self.removals,
            clears: self.clears,
            aging_passes: self.aging_passes,
            len,
            capacity,
        }
    }
}

/// Point-in-time copy of an engine's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub gets: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub puts: u64,
    pub put_updates: u64,
    pub put_inserts: u64,
    pub evictions: u64,
    pub removals: u64,
    pub clears: u64,
    /// Frequency-decay passes; only the LFU-Aging engine bumps this.
    pub aging_passes: u64,
    pub len: usize,
    pub capacity: usize,
}

impl MetricsSnapshot {
    /// Hit fraction over all `get` lookups, or `None` before the first one.
    pub fn hit_rate(&self) -> Option<f64> {
        if self.gets == 0 {
            None
        } else {
            Some(self.get_hits as f64 / self.gets as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_counters() {
        let mut m = EngineMetrics::default();
        m.record_get_hit();
        m.record_get_miss();
        m.record_put_insert();
        m.record_eviction();

        let snap = m.snapshot(3, 8);
        assert_eq!(snap.gets, 2);
        assert_eq!(snap.get_hits, 1);
        assert_eq!(snap.get_misses, 1);
        assert_eq!(snap.put_inserts, 1);
        assert_eq!(snap.evictions, 1);
        assert_eq!(snap.len, 3);
        assert_eq!(snap.capacity, 8);
    }

    #[test]
    fn hit_rate_handles_no_lookups() {
        let m = EngineMetrics::default();
        assert_eq!(m.snapshot(0, 4).hit_rate(), None);

        let mut m = EngineMetrics::default();
        m.record_get_hit();
        m.record_get_hit();
        m.record_get_miss();
        let rate = m.snapshot(0, 4).hit_rate().unwrap();
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    }
}
