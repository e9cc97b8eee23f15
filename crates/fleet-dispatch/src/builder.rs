//! Fluent builder for constructing a [`Driver`].

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use fleet_core::FleetConfig;
use fleet_transport::TrackingClient;
use fleet_world::WorldModel;

use crate::driver::UnitSlot;
use crate::pacing::controllers_for;
use crate::stats::StatisticsRecorder;
use crate::{Driver, DispatchResult};

/// Fluent builder for [`Driver<W, C>`].
///
/// # Required inputs
///
/// - [`FleetConfig`]: pacing, seed, limits
/// - `W: WorldModel`: an already populated world
/// - `C: TrackingClient`: an already connected client
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                           |
/// |-----------------------|-----------------------------------|
/// | `.cancel_token(t)`    | A fresh `CancellationToken`       |
/// | `.statistics(s)`      | A fresh `StatisticsRecorder`      |
///
/// # Example
///
/// ```rust,ignore
/// let world = Arc::new(GridWorld::new(256, 256));
/// let client = Arc::new(MemoryTracker::new());
/// prepare(&config, world.as_ref(), client.as_ref()).await?;
/// let mut driver = DriverBuilder::new(config, world, client)
///     .cancel_token(shutdown.token().clone())
///     .build()?;
/// let report = driver.run(&mut NoopObserver).await?;
/// ```
pub struct DriverBuilder<W: WorldModel, C: TrackingClient> {
    config: FleetConfig,
    world:  Arc<W>,
    client: Arc<C>,
    cancel: Option<CancellationToken>,
    stats:  Option<Arc<StatisticsRecorder>>,
}

impl<W: WorldModel, C: TrackingClient> DriverBuilder<W, C> {
    pub fn new(config: FleetConfig, world: Arc<W>, client: Arc<C>) -> Self {
        Self { config, world, client, cancel: None, stats: None }
    }

    /// Share the run's cancellation token with the shutdown coordinator.
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Record into an existing recorder, e.g. one a progress reporter reads.
    pub fn statistics(mut self, stats: Arc<StatisticsRecorder>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Validate the configuration, snapshot the unit list, and set up
    /// pacing for every unit.
    pub fn build(self) -> DispatchResult<Driver<W, C>> {
        self.config.validate()?;

        let units = self.world.delivery_units();
        let mut pacing: FxHashMap<_, _> =
            controllers_for(&self.config, units.iter().map(|u| u.id)).into_iter().collect();

        let slots: Vec<UnitSlot> = units
            .into_iter()
            .map(|u| UnitSlot {
                pacing:   pacing.remove(&u.id),
                id:       u.id,
                name:     Arc::from(u.name),
                failures: 0,
            })
            .collect();
        let slot_of = slots.iter().enumerate().map(|(i, s)| (s.id, i)).collect();

        Ok(Driver {
            config:  self.config,
            world:   self.world,
            client:  self.client,
            stats:   self.stats.unwrap_or_default(),
            cancel:  self.cancel.unwrap_or_default(),
            units:   slots,
            slot_of,
            rounds:  0,
            started: Instant::now(),
        })
    }
}
