//! Fan-out/fan-in of the five per-intersection streams.
//!
//! Every fetch is a labeled task: it carries the [`FetchTag`] of the cycle that issued it and
//! reports a [`SlotUpdate`] back to the session loop. Whether the update still matters is
//! decided in one place, [`Aggregator::apply`].

use crate::model::{SlotValue, ViewModel};
use crate::prelude::{FetchResult, TelemetryBackend};
use crate::selection::{FetchTag, SelectionState};
use crate::telemetry::{LogManager, MetricsRecorder};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub use crate::model::Slot;

impl Slot {
    /// Performs the round trip for this slot.
    pub async fn fetch(self, backend: &dyn TelemetryBackend, id: &str) -> FetchResult<SlotValue> {
        match self {
            Slot::TrafficData => backend.traffic_data(id).await.map(SlotValue::TrafficData),
            Slot::Prediction => backend.prediction(id).await.map(SlotValue::Prediction),
            Slot::EnvironmentalImpact => backend
                .environmental_impact(id)
                .await
                .map(SlotValue::EnvironmentalImpact),
            Slot::Alerts => backend.alerts(id).await.map(SlotValue::Alerts),
            Slot::AiConfidence => backend.ai_confidence(id).await.map(SlotValue::AiConfidence),
        }
    }
}

/// Completion report of one labeled fetch.
#[derive(Debug, Clone)]
pub struct SlotUpdate {
    pub tag: FetchTag,
    pub slot: Slot,
    pub result: FetchResult<SlotValue>,
}

/// What happened to a [`SlotUpdate`] once it reached the view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Discarded,
    Failed,
}

pub struct Aggregator {
    backend: Arc<dyn TelemetryBackend>,
    updates: UnboundedSender<SlotUpdate>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl Aggregator {
    pub fn new(
        backend: Arc<dyn TelemetryBackend>,
        updates: UnboundedSender<SlotUpdate>,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        Self {
            backend,
            updates,
            metrics,
            logger: LogManager::new("aggregator"),
        }
    }

    /// Issues all five fetches for `tag` without waiting for any of them.
    pub fn refresh(&self, tag: &FetchTag) {
        self.logger.trace(&format!(
            "refresh {} (generation {})",
            tag.intersection_id, tag.generation
        ));
        for slot in Slot::ALL {
            self.issue(slot, tag.clone());
        }
    }

    /// Spawns a single labeled fetch. Must be called within a tokio runtime.
    pub fn issue(&self, slot: Slot, tag: FetchTag) {
        let backend = self.backend.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = slot.fetch(backend.as_ref(), &tag.intersection_id).await;
            // The session may already be gone; its late results are irrelevant.
            let _ = updates.send(SlotUpdate { tag, slot, result });
        });
    }

    /// Merges a completed fetch into `view` if it belongs to the current cycle.
    pub fn apply(
        &self,
        selection: &SelectionState,
        view: &mut ViewModel,
        update: SlotUpdate,
    ) -> ApplyOutcome {
        if !selection.is_current(&update.tag) {
            self.metrics.record_discarded();
            self.logger.trace(&format!(
                "discarding {:?} for {} (generation {}, current {})",
                update.slot,
                update.tag.intersection_id,
                update.tag.generation,
                selection.generation()
            ));
            return ApplyOutcome::Discarded;
        }

        match update.result {
            Ok(value) => {
                debug_assert_eq!(value.slot(), update.slot);
                view.apply(value);
                self.metrics.record_applied();
                ApplyOutcome::Applied
            }
            Err(err) => {
                self.logger.report_failure(&update.tag.intersection_id, &err);
                self.metrics.record_failed();
                ApplyOutcome::Failed
            }
        }
    }
}
