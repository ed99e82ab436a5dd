use crate::prelude::FetchError;
use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags every line with its component.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }

    /// Surfaces a failed round trip once. Nothing retries it.
    pub fn report_failure(&self, intersection_id: &str, error: &FetchError) {
        warn!(
            "[{}] {} for {} failed: {}",
            self.component,
            error.endpoint(),
            intersection_id,
            error
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("core")
    }
}
