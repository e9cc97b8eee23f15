//! `fleet-dispatch` — the round-based dispatch engine of the rust_fleet
//! workspace.
//!
//! # Round loop
//!
//! ```text
//! loop:
//!   ① Census  — query every unit's status; stop when none is Pending
//!               (or when max_rounds rounds have run).
//!   ② Fan-out — spawn one DeliveryTask per Pending unit.
//!   ③ Barrier — join every task of the round.
//!   ④ Settle  — take pacing state back; strand units whose consecutive
//!               failures reached max_unit_failures.
//! ```
//!
//! Per-unit failures are counted in the [`StatisticsRecorder`] and retried
//! next round; only startup failures, world-model faults and cancellation
//! end a run with an error.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`driver`]   | `Driver`, `FinalReport`                                  |
//! | [`builder`]  | `DriverBuilder`                                          |
//! | [`task`]     | `DeliveryTask`, `TaskOutcome`                            |
//! | [`pacing`]   | `PacingController`, `Pacer`, `SharedPacing`              |
//! | [`stats`]    | `StatisticsRecorder`, `Operation`, `OperationRow`        |
//! | [`observer`] | `DriverObserver`, `RoundSummary`, `NoopObserver`         |
//! | [`startup`]  | `prepare` — populate and connect                         |
//! | [`shutdown`] | `ShutdownCoordinator`, `wait_for_signal`                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use fleet_core::FleetConfig;
//! use fleet_dispatch::{prepare, DriverBuilder, NoopObserver};
//! use fleet_transport::MemoryTracker;
//! use fleet_world::GridWorld;
//!
//! let config = FleetConfig::default();
//! let world = Arc::new(GridWorld::new(config.grid_width, config.grid_height));
//! let client = Arc::new(MemoryTracker::new());
//! prepare(&config, world.as_ref(), client.as_ref()).await?;
//! let mut driver = DriverBuilder::new(config, world, client).build()?;
//! let report = driver.run(&mut NoopObserver).await?;
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod observer;
pub mod pacing;
pub mod shutdown;
pub mod startup;
pub mod stats;
pub mod task;


pub use builder::DriverBuilder;
pub use driver::{Driver, FinalReport};
pub use error::{DispatchError, DispatchResult};
pub use observer::{DriverObserver, NoopObserver, RoundSummary};
pub use pacing::{PacingController, Pacer, SharedPacing};
pub use shutdown::{wait_for_signal, ShutdownCoordinator};
pub use startup::{prepare, Population};
pub use stats::{Operation, OperationRow, StatisticsRecorder};
pub use task::{announcement, DeliveryTask, TaskOutcome, TaskReport};
