use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trafficcore::model::Coordinate;
use trafficcore::SessionConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub base_url: String,
    /// Device position; the session falls back to `session.fallback` when absent.
    pub location: Option<Coordinate>,
    /// Intersection to follow; the first one in the directory when absent.
    pub intersection: Option<String>,
    /// Request one optimization once the first confidence value arrives.
    pub optimize: bool,
    /// Stop after this many seconds instead of waiting for Ctrl+C.
    pub duration_secs: Option<u64>,
    pub session: SessionConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            location: None,
            intersection: None,
            optimize: false,
            duration_secs: None,
            session: SessionConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading monitor config {}", path_ref.display()))?;
        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing monitor config {}", path_ref.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_point_at_the_local_service() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.session.search_radius, 1000);
        assert!(cfg.location.is_none());
    }

    #[test]
    fn config_load_reads_nested_session_settings() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"base_url: http://10.0.0.5:5000\nintersection: INT-003\nlocation:\n  lat: -1.95\n  lon: 30.1\nsession:\n  search_radius: 400\n  simulation_seed: 11\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = MonitorConfig::load(&path).unwrap();
        assert_eq!(cfg.base_url, "http://10.0.0.5:5000");
        assert_eq!(cfg.intersection.as_deref(), Some("INT-003"));
        assert_eq!(cfg.location, Some(Coordinate::new(-1.95, 30.1)));
        assert_eq!(cfg.session.search_radius, 400);
        assert_eq!(cfg.session.simulation_seed, Some(11));
        assert_eq!(cfg.session.tick_interval_secs, 5);
    }

    #[test]
    fn config_load_rejects_malformed_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"session: [not, a, map]\n").unwrap();
        let path = temp.into_temp_path();
        let err = MonitorConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("parsing monitor config"));
    }
}
