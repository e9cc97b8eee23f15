//! `DeliveryTask` — one unit's work for one round.
//!
//! # Steps
//!
//! ```text
//! ① Pace     — sleep for the pacing ceiling, then decay it.  Shutdown
//!              cuts the sleep short; the report below then fails fast
//!              and is counted like any other transport error.
//! ② Route    — remember the prior cell; advance one cell toward the
//!              nearest warehouse.
//! ③ Move     — report the new cell.  A failure ends the task; the world
//!              keeps the new position.
//!              new != prior → still moving, done.
//! ④ Detect   — new == prior → look for a warehouse on this cell.
//!              None → routing anomaly, logged only.
//! ⑤ Arrive   — report the arrival.  Success marks the unit Arrived;
//!              failure leaves it Pending for the next round.
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fleet_core::{Coordinate, UnitId, WarehouseId};
use fleet_transport::{ArrivalReport, TrackingClient};
use fleet_world::{EntityKind, WorldModel};

use crate::pacing::PacingController;
use crate::stats::{Operation, StatisticsRecorder};

/// The message attached to an arrival report.
pub fn announcement(name: &str, at: Coordinate) -> String {
    format!("{name} moving to - {at} - Reached Objective.")
}

/// What one task invocation achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Moved one cell and the movement was reported.
    Moved { to: Coordinate },
    /// The movement report failed.
    MoveReportFailed,
    /// Stood still on a cell without a warehouse.
    RoutingAnomaly { at: Coordinate },
    /// Arrival reported and recorded.
    Arrived { warehouse: WarehouseId },
    /// The arrival report failed; retried next round.
    ArrivalReportFailed { warehouse: WarehouseId },
    /// The world model refused to route or transition the unit.
    WorldRejected,
}

impl TaskOutcome {
    /// `true` for outcomes that count against a unit's failure budget.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            TaskOutcome::MoveReportFailed
                | TaskOutcome::RoutingAnomaly { .. }
                | TaskOutcome::ArrivalReportFailed { .. }
                | TaskOutcome::WorldRejected
        )
    }

    /// `true` for outcomes that make progress and reset the failure budget.
    pub fn is_progress(self) -> bool {
        matches!(self, TaskOutcome::Moved { .. } | TaskOutcome::Arrived { .. })
    }
}

/// A finished task, handing the unit's pacing state back to the driver.
#[derive(Debug)]
pub struct TaskReport {
    pub unit:    UnitId,
    pub outcome: TaskOutcome,
    pub pacing:  PacingController,
}

/// Work for one pending unit in one round.
pub struct DeliveryTask<W: WorldModel, C: TrackingClient> {
    unit:   UnitId,
    name:   Arc<str>,
    world:  Arc<W>,
    client: Arc<C>,
    stats:  Arc<StatisticsRecorder>,
    cancel: CancellationToken,
    pacing: PacingController,
}

impl<W: WorldModel, C: TrackingClient> DeliveryTask<W, C> {
    pub fn new(
        unit:   UnitId,
        name:   Arc<str>,
        world:  Arc<W>,
        client: Arc<C>,
        stats:  Arc<StatisticsRecorder>,
        cancel: CancellationToken,
        pacing: PacingController,
    ) -> Self {
        Self { unit, name, world, client, stats, cancel, pacing }
    }

    /// Run the task to completion.  Never fails: every problem becomes a
    /// [`TaskOutcome`].
    pub async fn run(mut self) -> TaskReport {
        let outcome = self.step().await;
        TaskReport { unit: self.unit, outcome, pacing: self.pacing }
    }

    async fn step(&mut self) -> TaskOutcome {
        let unit = self.unit;

        // ── ① Pace ────────────────────────────────────────────────────────
        let wait = self.pacing.next_wait();
        if !wait.is_zero() {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(wait) => {}
            }
        }

        // ── ② Route ───────────────────────────────────────────────────────
        let prior = match self.world.unit_position(unit) {
            Ok(at) => at,
            Err(error) => {
                warn!(%unit, %error, "Cannot locate unit");
                return TaskOutcome::WorldRejected;
            }
        };
        let current = match self.world.advance_toward_nearest_warehouse(unit) {
            Ok(at) => at,
            Err(error) => {
                warn!(%unit, %error, "Cannot route unit");
                return TaskOutcome::WorldRejected;
            }
        };

        // ── ③ Report movement ─────────────────────────────────────────────
        self.stats.record_attempt(Operation::MoveUnit);
        if let Err(error) = self.client.report_move(&self.cancel, unit, current).await {
            self.stats.record_error(Operation::MoveUnit);
            warn!(%unit, x = current.x, y = current.y, %error, "MoveUnit failed");
            return TaskOutcome::MoveReportFailed;
        }
        if current != prior {
            debug!(%unit, x = current.x, y = current.y, "Unit moved");
            return TaskOutcome::Moved { to: current };
        }

        // ── ④ Detect arrival ──────────────────────────────────────────────
        let warehouse = self
            .world
            .find_entity_at(current, EntityKind::Warehouse)
            .and_then(|e| e.as_warehouse().copied());
        let Some(warehouse) = warehouse else {
            warn!(%unit, x = current.x, y = current.y, "Unit stopped on a cell without a warehouse");
            return TaskOutcome::RoutingAnomaly { at: current };
        };

        // ── ⑤ Report arrival ──────────────────────────────────────────────
        let report = ArrivalReport {
            unit,
            warehouse:  warehouse.id,
            coordinate: current,
            message:    announcement(&self.name, current),
        };
        self.stats.record_attempt(Operation::UnitReachedWarehouse);
        if let Err(error) = self.client.report_arrival(&self.cancel, &report).await {
            self.stats.record_error(Operation::UnitReachedWarehouse);
            warn!(%unit, warehouse = %warehouse.id, %error, "UnitReachedWarehouse failed");
            return TaskOutcome::ArrivalReportFailed { warehouse: warehouse.id };
        }

        match self.world.mark_arrived(unit) {
            Ok(()) => {
                info!(%unit, warehouse = %warehouse.id, "{}", report.message);
                TaskOutcome::Arrived { warehouse: warehouse.id }
            }
            Err(error) => {
                warn!(%unit, %error, "Arrival acknowledged but not recorded");
                TaskOutcome::WorldRejected
            }
        }
    }
}
