use serde::{Deserialize, Serialize};

/// One point of the traffic history chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSample {
    pub time: String,
    pub vehicle_count: u32,
    pub average_speed: f64,
}

/// Savings attributed to signal optimization: litres of fuel and kg of CO2.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub fuel_saved: f64,
    pub emissions_reduced: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub title: String,
    pub description: String,
}

/// Body of `/api/predict/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReply {
    pub prediction: String,
}

/// Body of `/api/ai-confidence/{id}`; a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReply {
    pub confidence: f64,
}

/// Body of `POST /api/optimize/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReply {
    pub message: String,
}
