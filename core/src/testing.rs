use crate::model::{
    AlertRecord, Coordinate, EnvironmentalImpact, Intersection, TrafficSample,
};
use crate::prelude::{Endpoint, FetchError, FetchResult, TelemetryBackend};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Backend double with per-(endpoint, id) latency and failures. Payloads embed the id so
/// tests can tell which intersection a value came from.
#[derive(Default)]
pub struct ScriptedBackend {
    intersections: Vec<Intersection>,
    delays: HashMap<(Endpoint, String), Duration>,
    failures: HashSet<(Endpoint, String)>,
    calls: Mutex<HashMap<(Endpoint, String), usize>>,
    seed_centers: Mutex<Vec<Coordinate>>,
}

const SEED_KEY: &str = "*";

impl ScriptedBackend {
    pub fn new() -> Self {
        let mut a = Intersection::new("A", "Kimihurura", -1.951, 30.091);
        a.traffic_level = 0.2;
        let mut b = Intersection::new("B", "Sonatubes", -1.963, 30.105);
        b.traffic_level = 0.8;
        Self {
            intersections: vec![a, b],
            ..Default::default()
        }
    }

    pub fn with_intersections(mut self, intersections: Vec<Intersection>) -> Self {
        self.intersections = intersections;
        self
    }

    pub fn delayed(mut self, endpoint: Endpoint, id: &str, delay: Duration) -> Self {
        self.delays.insert((endpoint, id.to_string()), delay);
        self
    }

    pub fn delayed_seed(self, delay: Duration) -> Self {
        self.delayed(Endpoint::Intersections, SEED_KEY, delay)
    }

    /// Delays every per-intersection endpoint for `id`.
    pub fn delayed_all(mut self, id: &str, delay: Duration) -> Self {
        for endpoint in [
            Endpoint::TrafficData,
            Endpoint::Predict,
            Endpoint::EnvironmentalImpact,
            Endpoint::Alerts,
            Endpoint::AiConfidence,
        ] {
            self = self.delayed(endpoint, id, delay);
        }
        self
    }

    pub fn failing(mut self, endpoint: Endpoint, id: &str) -> Self {
        self.failures.insert((endpoint, id.to_string()));
        self
    }

    pub fn calls(&self, endpoint: Endpoint, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(endpoint, id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn seed_centers(&self) -> Vec<Coordinate> {
        self.seed_centers.lock().unwrap().clone()
    }

    async fn round_trip(&self, endpoint: Endpoint, id: &str) -> FetchResult<()> {
        let key = (endpoint, id.to_string());
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&key) {
            return Err(FetchError::Status {
                endpoint,
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TelemetryBackend for ScriptedBackend {
    async fn intersections(
        &self,
        center: Coordinate,
        _radius: u32,
    ) -> FetchResult<Vec<Intersection>> {
        self.seed_centers.lock().unwrap().push(center);
        self.round_trip(Endpoint::Intersections, SEED_KEY).await?;
        Ok(self.intersections.clone())
    }

    async fn traffic_data(&self, id: &str) -> FetchResult<Vec<TrafficSample>> {
        self.round_trip(Endpoint::TrafficData, id).await?;
        Ok(vec![
            TrafficSample {
                time: format!("{id} 08:00"),
                vehicle_count: 120,
                average_speed: 31.5,
            },
            TrafficSample {
                time: format!("{id} 09:00"),
                vehicle_count: 95,
                average_speed: 38.0,
            },
        ])
    }

    async fn prediction(&self, id: &str) -> FetchResult<String> {
        self.round_trip(Endpoint::Predict, id).await?;
        Ok(format!("forecast for {id}"))
    }

    async fn environmental_impact(&self, id: &str) -> FetchResult<EnvironmentalImpact> {
        self.round_trip(Endpoint::EnvironmentalImpact, id).await?;
        let weight = id.len() as f64;
        Ok(EnvironmentalImpact {
            fuel_saved: 10.0 * weight,
            emissions_reduced: 23.0 * weight,
        })
    }

    async fn alerts(&self, id: &str) -> FetchResult<Vec<AlertRecord>> {
        self.round_trip(Endpoint::Alerts, id).await?;
        Ok(vec![AlertRecord {
            title: format!("Congestion at {id}"),
            description: "Queue beyond stop line".into(),
        }])
    }

    async fn ai_confidence(&self, id: &str) -> FetchResult<f64> {
        self.round_trip(Endpoint::AiConfidence, id).await?;
        Ok(if id == "A" { 87.5 } else { 64.0 })
    }

    async fn optimize(&self, id: &str) -> FetchResult<String> {
        self.round_trip(Endpoint::Optimize, id).await?;
        Ok(format!("Signals at {id} optimized"))
    }
}
