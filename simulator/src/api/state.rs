use crate::generator::profile::MetricProfile;
use crate::generator::template::{intersection_id, layout};
use crate::service::config::ServiceConfig;
use std::collections::HashMap;
use std::sync::RwLock;
use trafficcore::model::{Coordinate, Intersection};

/// Shared state behind every route: the configuration and per-intersection optimization counts.
pub struct ServiceState {
    config: ServiceConfig,
    optimizations: RwLock<HashMap<String, u32>>,
}

impl ServiceState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            optimizations: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn intersections(&self, center: Coordinate, radius: u32) -> Vec<Intersection> {
        let mut items = layout(center, radius, self.config.intersections);
        for item in &mut items {
            item.traffic_level = self.profile(&item.id).confidence() / 100.0 * 0.8;
        }
        items
    }

    pub fn knows(&self, id: &str) -> bool {
        (0..self.config.intersections).any(|index| intersection_id(index) == id)
    }

    pub fn profile(&self, id: &str) -> MetricProfile {
        MetricProfile::new(self.config.seed, id, self.optimization_count(id))
    }

    pub fn optimization_count(&self, id: &str) -> u32 {
        self.optimizations
            .read()
            .map(|guard| guard.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Records one more optimization pass and returns the new count.
    pub fn optimize(&self, id: &str) -> u32 {
        match self.optimizations.write() {
            Ok(mut guard) => {
                let count = guard.entry(id.to_string()).or_insert(0);
                *count += 1;
                *count
            }
            Err(_) => 0,
        }
    }
}
