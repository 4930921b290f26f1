use crate::prelude::{GroupBy, ReportError};
use log::{debug, info, warn};

/// Thin wrapper over the `log` facade so every cycle is reported the same way.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new() -> Self {
        Self::with_target("trackcore")
    }

    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn record_rejected(&self, index: usize, error: &ReportError) {
        warn!(target: self.target, "report #{} rejected: {}", index, error);
    }

    pub fn record_cycle(&self, group_by: GroupBy, travelling: usize, arrived: usize) {
        info!(
            target: self.target,
            "refresh by {}: {} travelling, {} arrived",
            group_by,
            travelling,
            arrived
        );
    }

    pub fn record_detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
