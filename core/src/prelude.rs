use crate::model::{
    AlertRecord, Coordinate, EnvironmentalImpact, Intersection, TrafficSample,
};
use async_trait::async_trait;
use std::fmt;

/// Endpoints exposed by the telemetry service, relative to its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Intersections,
    TrafficData,
    Predict,
    EnvironmentalImpact,
    Alerts,
    AiConfidence,
    Optimize,
}

impl Endpoint {
    /// Relative path for this endpoint. `Intersections` ignores `id`; its query string is
    /// appended by the caller.
    pub fn path(self, id: &str) -> String {
        match self {
            Endpoint::Intersections => "/api/intersections".to_string(),
            Endpoint::TrafficData => format!("/api/traffic-data/{id}"),
            Endpoint::Predict => format!("/api/predict/{id}"),
            Endpoint::EnvironmentalImpact => format!("/api/environmental-impact/{id}"),
            Endpoint::Alerts => format!("/api/alerts/{id}"),
            Endpoint::AiConfidence => format!("/api/ai-confidence/{id}"),
            Endpoint::Optimize => format!("/api/optimize/{id}"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Intersections => "intersections",
            Endpoint::TrafficData => "traffic-data",
            Endpoint::Predict => "predict",
            Endpoint::EnvironmentalImpact => "environmental-impact",
            Endpoint::Alerts => "alerts",
            Endpoint::AiConfidence => "ai-confidence",
            Endpoint::Optimize => "optimize",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a single backend round trip.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("transport failure on {endpoint}: {message}")]
    Transport { endpoint: Endpoint, message: String },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("malformed {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => *endpoint,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Why the device could not supply a position.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location request timed out")]
    Timeout,
    #[error("location is not supported on this device")]
    Unsupported,
}

/// Errors returned by a [`crate::SessionHandle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has been shut down")]
    Closed,
}

/// Remote telemetry service consumed by the session.
#[async_trait]
pub trait TelemetryBackend: Send + Sync {
    async fn intersections(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> FetchResult<Vec<Intersection>>;
    async fn traffic_data(&self, id: &str) -> FetchResult<Vec<TrafficSample>>;
    async fn prediction(&self, id: &str) -> FetchResult<String>;
    async fn environmental_impact(&self, id: &str) -> FetchResult<EnvironmentalImpact>;
    async fn alerts(&self, id: &str) -> FetchResult<Vec<AlertRecord>>;
    async fn ai_confidence(&self, id: &str) -> FetchResult<f64>;
    /// Posts an optimization command and returns the acknowledgement message.
    async fn optimize(&self, id: &str) -> FetchResult<String>;
}

/// Source of the device position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Coordinate, GeolocationError>;
}
