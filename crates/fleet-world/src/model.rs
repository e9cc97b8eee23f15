//! The `WorldModel` trait — the seam between the dispatch engine and the world.

use fleet_core::{Coordinate, SimRng, UnitId, UnitStatus};

use crate::{DeliveryUnit, Entity, EntityKind, WorldResult};

/// Owner of unit and warehouse placement, routing, and unit status.
///
/// # Thread safety
///
/// The dispatch engine calls into the model from many concurrent tasks in
/// the same round, so implementations must be `Send + Sync` and use
/// interior mutability for unit state.
pub trait WorldModel: Send + Sync + 'static {
    /// Place `warehouses` warehouses and `units` units on the grid.  Called
    /// once at startup.
    fn populate(&self, warehouses: u32, units: u32, rng: &mut SimRng) -> WorldResult<()>;

    /// Snapshot of every delivery unit, in ascending `UnitId` order.
    fn delivery_units(&self) -> Vec<DeliveryUnit>;

    /// Move `unit` one cell toward its nearest warehouse and return the
    /// resulting position.  Returns the unchanged position when the unit
    /// already stands on a warehouse.
    ///
    /// # Errors
    ///
    /// Fails for unknown units and for units in a terminal status.
    fn advance_toward_nearest_warehouse(&self, unit: UnitId) -> WorldResult<Coordinate>;

    /// The first entity of `kind` found at `at`.
    fn find_entity_at(&self, at: Coordinate, kind: EntityKind) -> Option<Entity>;

    /// Current position of `unit`.
    fn unit_position(&self, unit: UnitId) -> WorldResult<Coordinate>;

    /// Current status of `unit`.
    fn unit_status(&self, unit: UnitId) -> WorldResult<UnitStatus>;

    /// Transition `unit` from `Pending` to `Arrived`.
    fn mark_arrived(&self, unit: UnitId) -> WorldResult<()>;

    /// Transition `unit` from `Pending` to `Stranded`.
    fn mark_stranded(&self, unit: UnitId) -> WorldResult<()>;
}
