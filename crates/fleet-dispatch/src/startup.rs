//! Startup: populate the world, then connect to the tracking service.
//!
//! Either failure is fatal; the round loop never starts.

use tracing::info;

use fleet_core::{FleetConfig, SimRng};
use fleet_transport::TrackingClient;
use fleet_world::WorldModel;

use crate::DispatchResult;

/// Counts the world was populated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub warehouses: u32,
    pub units:      u32,
}

/// Validate `config`, populate `world`, and connect `client` within
/// `config.connect_timeout()`.
pub async fn prepare<W, C>(config: &FleetConfig, world: &W, client: &C) -> DispatchResult<Population>
where
    W: WorldModel,
    C: TrackingClient,
{
    config.validate()?;

    info!("initializing...");
    let mut rng = SimRng::new(config.seed);
    let (warehouses, units) = config.resolve_counts(&mut rng);
    world.populate(warehouses, units, &mut rng)?;

    info!(address = %config.api_address, timeout = ?config.connect_timeout(), "trying to connect...");
    client.connect(&config.api_address, config.connect_timeout()).await?;

    Ok(Population { warehouses, units })
}
