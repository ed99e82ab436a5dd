use crate::prelude::{FetchResult, TelemetryBackend};
use crate::telemetry::LogManager;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Result of one optimization command.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub intersection_id: String,
    pub result: FetchResult<String>,
}

/// Posts optimization commands and reports their acknowledgement to the session loop.
pub struct OptimizationTrigger {
    backend: Arc<dyn TelemetryBackend>,
    outcomes: UnboundedSender<OptimizationOutcome>,
    logger: LogManager,
}

impl OptimizationTrigger {
    pub fn new(
        backend: Arc<dyn TelemetryBackend>,
        outcomes: UnboundedSender<OptimizationOutcome>,
    ) -> Self {
        Self {
            backend,
            outcomes,
            logger: LogManager::new("optimizer"),
        }
    }

    pub fn optimize(&self, id: impl Into<String>) {
        let intersection_id = id.into();
        self.logger
            .record(&format!("optimization requested for {intersection_id}"));
        let backend = self.backend.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = backend.optimize(&intersection_id).await;
            let _ = outcomes.send(OptimizationOutcome {
                intersection_id,
                result,
            });
        });
    }
}
