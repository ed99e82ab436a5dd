use anyhow::Context;
use api::routes::routes;
use api::state::ServiceState;
use clap::Parser;
use log::info;
use service::config::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use warp::Filter;

mod api;
mod generator;
mod service;

#[derive(Parser)]
#[command(author, version, about = "Local telemetry service for the traffic monitor")]
struct Args {
    /// Load the service config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
    /// Seed for every generated metric
    #[arg(long, default_value_t = 312)]
    seed: u64,
    /// Intersections served around any requested coordinate
    #[arg(long, default_value_t = 8)]
    intersections: usize,
    /// Hourly points per traffic-data reply
    #[arg(long, default_value_t = 12)]
    samples: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        ServiceConfig::load(path)?
    } else {
        ServiceConfig::from_args(args.bind, args.seed, args.intersections, args.samples)
    };

    let bind = config.bind;
    let state = Arc::new(ServiceState::new(config));
    let api = routes(state).with(warp::log("simulator"));

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the telemetry service")?;
    runtime.block_on(async move {
        let (address, server) = warp::serve(api)
            .try_bind_with_graceful_shutdown(bind, async {
                let _ = signal::ctrl_c().await;
            })
            .with_context(|| format!("binding telemetry service to {bind}"))?;
        info!("telemetry service listening on http://{address} (Ctrl+C to stop)");
        server.await;
        info!("telemetry service stopped");
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}
