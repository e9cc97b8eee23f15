//! fleet-sim — run the dispatch engine end to end.
//!
//! Populates a grid with warehouses and delivery units, connects to the
//! tracking service, and dispatches rounds until every unit has reported its
//! arrival.  Prints the execution time and the per-operation table when done.
//!
//! SIGINT or SIGTERM cancels in-flight reports, disconnects once, and exits
//! with status 0 without printing a report.
//!
//! ```text
//! RUST_LOG=debug fleet-sim --transport memory --units 50 --warehouses 5
//! fleet-sim --address http://tracker:50051 --max-rounds 500 --output out/
//! ```

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_core::FleetConfig;
use fleet_dispatch::{
    prepare, wait_for_signal, DispatchError, DriverBuilder, DriverObserver, FinalReport,
    NoopObserver, ShutdownCoordinator,
};
use fleet_output::{render_report, CsvWriter, RunOutputObserver};
use fleet_transport::{HttpTrackingClient, MemoryTracker, TrackingClient};
use fleet_world::GridWorld;

use cli::{Cli, Transport};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Resolve on the first termination signal.  Never resolves if handlers
/// cannot be installed.
async fn termination() {
    match wait_for_signal().await {
        Ok(name) => info!(signal = name, "Termination requested"),
        Err(error) => {
            error!(%error, "Cannot install signal handlers");
            std::future::pending::<()>().await;
        }
    }
}

async fn dispatch<C, O>(
    config:      FleetConfig,
    world:       Arc<GridWorld>,
    client:      Arc<C>,
    coordinator: &ShutdownCoordinator<C>,
    observer:    &mut O,
) -> Result<Option<FinalReport>>
where
    C: TrackingClient,
    O: DriverObserver,
{
    let mut driver = DriverBuilder::new(config, world, client)
        .cancel_token(coordinator.token().clone())
        .build()?;
    match driver.run(observer).await {
        Ok(report) => Ok(Some(report)),
        Err(DispatchError::Cancelled { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn run<C: TrackingClient>(cli: &Cli, config: FleetConfig, client: Arc<C>) -> Result<()> {
    let world = Arc::new(GridWorld::new(config.grid_width, config.grid_height));
    let population = prepare(&config, world.as_ref(), client.as_ref()).await?;
    info!(warehouses = population.warehouses, units = population.units, "World ready");

    let coordinator = Arc::new(ShutdownCoordinator::new(CancellationToken::new(), Arc::clone(&client)));
    {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            if coordinator.watch(termination()).await {
                std::process::exit(0);
            }
        });
    }

    let report = match &cli.output {
        Some(dir) => {
            let mut observer = RunOutputObserver::new(CsvWriter::new(dir)?);
            let report = dispatch(config, world, client, &coordinator, &mut observer).await?;
            if let Some(e) = observer.take_error() {
                eprintln!("output error: {e}");
            }
            report
        }
        None => dispatch(config, world, client, &coordinator, &mut NoopObserver).await?,
    };

    // Cancelled runs end in the signal task's exit; nothing to print.
    let Some(report) = report else {
        return Ok(());
    };
    print!("{}", render_report(&report));
    coordinator.trigger().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.fleet_config()?;

    match cli.transport {
        Transport::Http => run(&cli, config, Arc::new(HttpTrackingClient::new())).await,
        Transport::Memory => {
            let tracker = MemoryTracker::new().with_latency(cli.latency.into());
            run(&cli, config, Arc::new(tracker)).await
        }
    }
}
