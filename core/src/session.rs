//! The session event loop.
//!
//! One task owns every piece of mutable state (directory, selection, view model). Network
//! round trips run in their own tasks and report back over channels, so state is only ever
//! touched from the loop and concurrency is limited to overlapping requests.

use crate::aggregator::{Aggregator, SlotUpdate};
use crate::config::SessionConfig;
use crate::directory::{IntersectionDirectory, SimulationFeed};
use crate::geolocation::GeolocationResolver;
use crate::model::{Coordinate, Intersection, ViewModel};
use crate::optimizer::{OptimizationOutcome, OptimizationTrigger};
use crate::prelude::{FetchResult, LocationProvider, SessionError, TelemetryBackend};
use crate::selection::SelectionState;
use crate::telemetry::{LogManager, MetricsRecorder, SyncStats};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug)]
enum Command {
    Select(String),
    Optimize(String),
    Shutdown,
}

#[derive(Debug)]
enum Bootstrap {
    Located(Coordinate),
    Seeded(FetchResult<Vec<Intersection>>),
}

pub struct Session;

impl Session {
    /// Starts a session on the current tokio runtime.
    ///
    /// The location is resolved and the directory seeded in the background; commands sent
    /// before that completes are processed in order as usual.
    pub fn start(
        config: SessionConfig,
        backend: Arc<dyn TelemetryBackend>,
        location: Arc<dyn LocationProvider>,
    ) -> SessionHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(ViewModel::new());
        let metrics = Arc::new(MetricsRecorder::new());

        let session = SessionLoop::new(config, backend, view_tx, metrics.clone());
        let task = tokio::spawn(session.run(location, commands_rx));

        SessionHandle {
            commands: commands_tx,
            view: view_rx,
            metrics,
            task,
        }
    }
}

/// Control surface of a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ViewModel>,
    metrics: Arc<MetricsRecorder>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Observes `id` and starts a fresh aggregation cycle, even if `id` is already selected.
    pub fn select(&self, id: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::Select(id.into()))
    }

    pub fn optimize(&self, id: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::Optimize(id.into()))
    }

    pub fn snapshot(&self) -> ViewModel {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view.clone()
    }

    pub fn stats(&self) -> SyncStats {
        self.metrics.snapshot()
    }

    /// Stops the ticker and the loop. In-flight fetches are left to finish unobserved.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        let _ = self.task.await;
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }
}

struct SessionLoop {
    config: SessionConfig,
    backend: Arc<dyn TelemetryBackend>,
    directory: IntersectionDirectory,
    feed: SimulationFeed,
    selection: SelectionState,
    view: ViewModel,
    aggregator: Aggregator,
    optimizer: OptimizationTrigger,
    slot_updates: mpsc::UnboundedReceiver<SlotUpdate>,
    outcomes: mpsc::UnboundedReceiver<OptimizationOutcome>,
    publisher: watch::Sender<ViewModel>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl SessionLoop {
    fn new(
        config: SessionConfig,
        backend: Arc<dyn TelemetryBackend>,
        publisher: watch::Sender<ViewModel>,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        let (slot_tx, slot_updates) = mpsc::unbounded_channel();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        Self {
            feed: SimulationFeed::new(config.simulation_seed),
            aggregator: Aggregator::new(backend.clone(), slot_tx, metrics.clone()),
            optimizer: OptimizationTrigger::new(backend.clone(), outcome_tx),
            config,
            backend,
            directory: IntersectionDirectory::new(),
            selection: SelectionState::new(),
            view: ViewModel::new(),
            slot_updates,
            outcomes,
            publisher,
            metrics,
            logger: LogManager::new("session"),
        }
    }

    async fn run(
        mut self,
        location: Arc<dyn LocationProvider>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let (boot_tx, mut boot_rx) = mpsc::unbounded_channel();
        self.spawn_bootstrap(location, boot_tx);

        let period = self.config.tick_interval();
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Select(id)) => self.select(id),
                    Some(Command::Optimize(id)) => self.optimizer.optimize(id),
                    Some(Command::Shutdown) | None => break,
                },
                Some(event) = boot_rx.recv() => self.bootstrap(event),
                Some(update) = self.slot_updates.recv() => {
                    self.aggregator.apply(&self.selection, &mut self.view, update);
                    self.publish();
                }
                Some(outcome) = self.outcomes.recv() => self.optimized(outcome),
                _ = ticker.tick() => self.tick(),
            }
        }

        self.logger.record("session stopped");
    }

    fn spawn_bootstrap(
        &self,
        location: Arc<dyn LocationProvider>,
        events: mpsc::UnboundedSender<Bootstrap>,
    ) {
        let resolver = GeolocationResolver::new(location, self.config.fallback);
        let backend = self.backend.clone();
        let radius = self.config.search_radius;
        tokio::spawn(async move {
            let center = resolver.resolve().await;
            if events.send(Bootstrap::Located(center)).is_err() {
                return;
            }
            let seeded = IntersectionDirectory::seed(backend.as_ref(), center, radius).await;
            let _ = events.send(Bootstrap::Seeded(seeded));
        });
    }

    fn bootstrap(&mut self, event: Bootstrap) {
        match event {
            Bootstrap::Located(center) => {
                self.view.map_center = Some(center);
                self.logger.record(&format!(
                    "centred on {:.4}, {:.4}; seeding within {} m",
                    center.lat, center.lon, self.config.search_radius
                ));
            }
            Bootstrap::Seeded(Ok(intersections)) => {
                let count = self.directory.install(intersections);
                self.view.intersections = self.directory.snapshot().to_vec();
                self.logger
                    .record(&format!("directory seeded with {count} intersections"));
            }
            Bootstrap::Seeded(Err(err)) => {
                self.logger.report_failure("directory", &err);
            }
        }
        self.publish();
    }

    fn select(&mut self, id: String) {
        if self.directory.is_seeded() && !self.directory.contains(&id) {
            self.logger
                .warn(&format!("selected {id} is not in the directory"));
        }
        let tag = self.selection.select(id);
        self.view.selected = Some(tag.intersection_id.clone());
        if self.config.clear_stale_on_select {
            self.view.clear_slots();
        }
        self.publish();
        self.aggregator.refresh(&tag);
    }

    fn optimized(&mut self, outcome: OptimizationOutcome) {
        match outcome.result {
            Ok(message) => {
                self.metrics.record_optimization(true);
                self.logger.record(&format!(
                    "optimization acknowledged for {}: {message}",
                    outcome.intersection_id
                ));
                self.view.optimization_status = Some(message);
                self.publish();
                // Only the selected id refreshes; a cycle for any other id would be
                // discarded and would supersede the one in flight.
                if self.selection.current() == Some(outcome.intersection_id.as_str()) {
                    if let Some(tag) = self.selection.begin_cycle() {
                        self.aggregator.refresh(&tag);
                    }
                }
            }
            Err(err) => {
                self.metrics.record_optimization(false);
                self.logger.report_failure(&outcome.intersection_id, &err);
            }
        }
    }

    fn tick(&mut self) {
        self.metrics.record_tick();
        if self.feed.tick(&mut self.directory) > 0 {
            self.view.intersections = self.directory.snapshot().to_vec();
            self.publish();
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.view.clone());
    }
}
