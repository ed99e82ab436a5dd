use std::sync::Mutex;

/// Counters describing how slot updates and optimization outcomes were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub applied: usize,
    pub discarded: usize,
    pub failed: usize,
    pub optimizations: usize,
    pub optimization_failures: usize,
    pub ticks: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<SyncStats>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SyncStats::default()),
        }
    }

    pub fn record_applied(&self) {
        self.update(|stats| stats.applied += 1);
    }

    pub fn record_discarded(&self) {
        self.update(|stats| stats.discarded += 1);
    }

    pub fn record_failed(&self) {
        self.update(|stats| stats.failed += 1);
    }

    pub fn record_optimization(&self, succeeded: bool) {
        self.update(|stats| {
            if succeeded {
                stats.optimizations += 1;
            } else {
                stats.optimization_failures += 1;
            }
        });
    }

    pub fn record_tick(&self) {
        self.update(|stats| stats.ticks += 1);
    }

    pub fn snapshot(&self) -> SyncStats {
        if let Ok(stats) = self.inner.lock() {
            *stats
        } else {
            SyncStats::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SyncStats)) {
        if let Ok(mut stats) = self.inner.lock() {
            apply(&mut stats);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
