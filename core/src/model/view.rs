use super::intersection::{Coordinate, Intersection};
use super::metrics::{AlertRecord, EnvironmentalImpact, TrafficSample};
use crate::prelude::Endpoint;
use serde::Serialize;

/// The five per-intersection streams refreshed on every selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    TrafficData,
    Prediction,
    EnvironmentalImpact,
    Alerts,
    AiConfidence,
}

impl Slot {
    /// Fan-out order of a refresh cycle.
    pub const ALL: [Slot; 5] = [
        Slot::TrafficData,
        Slot::Prediction,
        Slot::EnvironmentalImpact,
        Slot::Alerts,
        Slot::AiConfidence,
    ];

    pub fn endpoint(self) -> Endpoint {
        match self {
            Slot::TrafficData => Endpoint::TrafficData,
            Slot::Prediction => Endpoint::Predict,
            Slot::EnvironmentalImpact => Endpoint::EnvironmentalImpact,
            Slot::Alerts => Endpoint::Alerts,
            Slot::AiConfidence => Endpoint::AiConfidence,
        }
    }
}

/// A decoded result for exactly one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    TrafficData(Vec<TrafficSample>),
    Prediction(String),
    EnvironmentalImpact(EnvironmentalImpact),
    Alerts(Vec<AlertRecord>),
    AiConfidence(f64),
}

impl SlotValue {
    pub fn slot(&self) -> Slot {
        match self {
            SlotValue::TrafficData(_) => Slot::TrafficData,
            SlotValue::Prediction(_) => Slot::Prediction,
            SlotValue::EnvironmentalImpact(_) => Slot::EnvironmentalImpact,
            SlotValue::Alerts(_) => Slot::Alerts,
            SlotValue::AiConfidence(_) => Slot::AiConfidence,
        }
    }
}

/// Read-only snapshot the presentation layer renders from.
///
/// `None` and empty sequences mean the slot has never been populated for this session.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewModel {
    pub map_center: Option<Coordinate>,
    pub intersections: Vec<Intersection>,
    pub selected: Option<String>,
    pub traffic_data: Vec<TrafficSample>,
    pub prediction: Option<String>,
    pub environmental_impact: Option<EnvironmentalImpact>,
    pub alerts: Vec<AlertRecord>,
    pub ai_confidence: Option<f64>,
    pub optimization_status: Option<String>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one slot wholesale.
    pub fn apply(&mut self, value: SlotValue) {
        match value {
            SlotValue::TrafficData(samples) => self.traffic_data = samples,
            SlotValue::Prediction(text) => self.prediction = Some(text),
            SlotValue::EnvironmentalImpact(impact) => self.environmental_impact = Some(impact),
            SlotValue::Alerts(alerts) => self.alerts = alerts,
            SlotValue::AiConfidence(confidence) => {
                self.ai_confidence = Some(confidence.clamp(0.0, 100.0))
            }
        }
    }

    /// Empties the five per-intersection slots.
    pub fn clear_slots(&mut self) {
        self.traffic_data.clear();
        self.prediction = None;
        self.environmental_impact = None;
        self.alerts.clear();
        self.ai_confidence = None;
    }

    pub fn selected_intersection(&self) -> Option<&Intersection> {
        let id = self.selected.as_deref()?;
        self.intersections.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_only_the_targeted_slot() {
        let mut view = ViewModel::new();
        view.apply(SlotValue::Prediction("heavy".into()));
        view.apply(SlotValue::Alerts(vec![AlertRecord {
            title: "Incident".into(),
            description: "Lane closed".into(),
        }]));
        view.apply(SlotValue::Prediction("light".into()));

        assert_eq!(view.prediction.as_deref(), Some("light"));
        assert_eq!(view.alerts.len(), 1);
        assert!(view.traffic_data.is_empty());
        assert!(view.ai_confidence.is_none());
    }

    #[test]
    fn confidence_is_clamped_to_percentage_range() {
        let mut view = ViewModel::new();
        view.apply(SlotValue::AiConfidence(140.0));
        assert_eq!(view.ai_confidence, Some(100.0));
    }

    #[test]
    fn slot_value_reports_its_slot() {
        for slot in Slot::ALL {
            let value = match slot {
                Slot::TrafficData => SlotValue::TrafficData(Vec::new()),
                Slot::Prediction => SlotValue::Prediction(String::new()),
                Slot::EnvironmentalImpact => {
                    SlotValue::EnvironmentalImpact(EnvironmentalImpact::default())
                }
                Slot::Alerts => SlotValue::Alerts(Vec::new()),
                Slot::AiConfidence => SlotValue::AiConfidence(0.0),
            };
            assert_eq!(value.slot(), slot);
        }
    }
}
