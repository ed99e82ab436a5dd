use crate::model::Coordinate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kigali city centre, used whenever the device cannot report a position.
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(-1.9441, 30.0619);

/// Longest simulation tick accepted; larger settings are lowered to this.
pub const MAX_TICK_INTERVAL_SECS: u64 = 86_400;

/// Session-wide settings shared by every component of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub fallback: Coordinate,
    /// Seed radius in metres around the resolved coordinate.
    pub search_radius: u32,
    pub tick_interval_secs: u64,
    /// Seeds the simulation feed; `None` draws from entropy.
    pub simulation_seed: Option<u64>,
    /// Empty the per-intersection slots on selection instead of showing the previous
    /// intersection's values until new ones arrive.
    pub clear_stale_on_select: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK,
            search_radius: 1000,
            tick_interval_secs: 5,
            simulation_seed: None,
            clear_stale_on_select: false,
        }
    }
}

impl SessionConfig {
    /// Simulation period, kept within one second and one day.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.clamp(1, MAX_TICK_INTERVAL_SECS))
    }
}
