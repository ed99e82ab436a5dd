use anyhow::Context;
use clap::Parser;
use http::HttpBackend;
use log::info;
use render::Console;
use settings::MonitorConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::{signal, time};
use trafficcore::geolocation::{FixedLocation, NoLocation};
use trafficcore::model::{Coordinate, ViewModel};
use trafficcore::{LocationProvider, Session, SessionHandle};

mod http;
mod render;
mod settings;

#[derive(Parser)]
#[command(author, version, about = "Follow a traffic intersection in real time")]
struct Args {
    /// Load the monitor config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "http://localhost:5000")]
    base_url: String,
    /// Device latitude; both --lat and --lon are needed to skip the fallback
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Intersection id to follow (defaults to the first one found)
    #[arg(long)]
    intersection: Option<String>,
    /// Request an optimization once the first metrics arrive
    #[arg(long, default_value_t = false)]
    optimize: bool,
    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<u64>,
    /// Seed for the simulated live traffic levels
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> MonitorConfig {
        let mut config = MonitorConfig {
            base_url: self.base_url,
            location: self.lat.zip(self.lon).map(|(lat, lon)| Coordinate::new(lat, lon)),
            intersection: self.intersection,
            optimize: self.optimize,
            duration_secs: self.duration,
            ..Default::default()
        };
        config.session.simulation_seed = self.seed;
        config
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config.clone() {
        MonitorConfig::load(path)?
    } else {
        args.into_config()
    };

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the monitor session")?;
    runtime.block_on(run(config))
}

async fn run(config: MonitorConfig) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(&config.base_url)?);
    let location: Arc<dyn LocationProvider> = match config.location {
        Some(coordinate) => Arc::new(FixedLocation(coordinate)),
        None => Arc::new(NoLocation),
    };
    info!("monitoring via {}", config.base_url);

    let session = Session::start(config.session.clone(), backend, location);
    let mut updates = session.subscribe();
    let mut console = Console::new();
    let mut follower = Follower::new(&config);
    follower.advance(&session, &ViewModel::default(), &mut console)?;

    let stop = async {
        match config.duration_secs {
            Some(secs) => time::sleep(Duration::from_secs(secs)).await,
            None => {
                let _ = signal::ctrl_c().await;
            }
        }
    };
    tokio::pin!(stop);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                follower.advance(&session, &view, &mut console)?;
                if let Some(frame) = console.frame(&view) {
                    println!("{frame}\n");
                }
            }
            _ = &mut stop => break,
        }
    }

    let stats = session.stats();
    println!(
        "Applied {} updates, discarded {}, failed {}; {} optimizations",
        stats.applied, stats.discarded, stats.failed, stats.optimizations
    );
    for entry in console.history() {
        println!("  {entry}");
    }
    session.shutdown().await;
    Ok(())
}

/// Drives the scripted part of a run: which intersection to select and when to optimize.
struct Follower {
    target: Option<String>,
    selected: Option<String>,
    optimize: bool,
}

impl Follower {
    fn new(config: &MonitorConfig) -> Self {
        Self {
            target: config.intersection.clone(),
            selected: None,
            optimize: config.optimize,
        }
    }

    fn advance(
        &mut self,
        session: &SessionHandle,
        view: &ViewModel,
        console: &mut Console,
    ) -> anyhow::Result<()> {
        if self.selected.is_none() {
            let choice = self
                .target
                .clone()
                .or_else(|| view.intersections.first().map(|item| item.id.clone()));
            if let Some(id) = choice {
                session.select(id.clone())?;
                console.push_history(format!("Selected {id}"));
                self.selected = Some(id);
            }
            return Ok(());
        }

        if self.optimize && view.ai_confidence.is_some() {
            if let Some(id) = self.selected.clone() {
                session.optimize(id.clone())?;
                console.push_history(format!("Optimization requested for {id}"));
            }
            self.optimize = false;
        }
        if let Some(status) = &view.optimization_status {
            if console.history().last() != Some(status) {
                console.push_history(status.clone());
            }
        }
        Ok(())
    }
}
