use serde::Serialize;
use std::sync::Mutex;

/// Process-wide counters shared by the relay and dashboard.
///
/// `accepted`, `rejected` and `duplicates` accumulate once per ingested
/// message. `last_accepted` and `last_rejected` describe only the most
/// recent full batch, for consumers that revalidate a whole poll each cycle.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub last_accepted: usize,
    pub last_rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_cycle(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
        }
    }

    pub fn record_accepted(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.accepted += count;
        }
    }

    pub fn record_rejected(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += count;
        }
    }

    pub fn record_duplicate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.duplicates += 1;
        }
    }

    /// Overwrites the per-batch gauges and counts one cycle.
    pub fn record_batch(&self, accepted: usize, rejected: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
            metrics.last_accepted = accepted;
            metrics.last_rejected = rejected;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
