//! `GridWorld` — the default in-memory [`WorldModel`].

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use fleet_core::{Coordinate, SimRng, UnitId, UnitStatus, WarehouseId};

use crate::{
    DeliveryUnit, Entity, EntityKind, Warehouse, WarehouseIndex, WorldError, WorldModel,
    WorldResult,
};

// ── Per-unit state ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct UnitState {
    name:     String,
    position: Coordinate,
    status:   UnitStatus,
}

/// Everything behind the world lock.  `units` is indexed by `UnitId`.
#[derive(Default)]
struct WorldState {
    units: Vec<UnitState>,
    index: WarehouseIndex,
}

impl WorldState {
    fn unit(&self, unit: UnitId) -> WorldResult<&UnitState> {
        self.units.get(unit.index()).ok_or(WorldError::UnitNotFound(unit))
    }

    fn unit_mut(&mut self, unit: UnitId) -> WorldResult<&mut UnitState> {
        self.units.get_mut(unit.index()).ok_or(WorldError::UnitNotFound(unit))
    }

    fn snapshot(&self, i: usize) -> DeliveryUnit {
        let u = &self.units[i];
        DeliveryUnit {
            id:       UnitId(i as u32),
            name:     u.name.clone(),
            position: u.position,
            status:   u.status,
        }
    }
}

fn unit_name(i: usize) -> String {
    format!("DeliveryUnit-{i}")
}

// ── GridWorld ─────────────────────────────────────────────────────────────────

/// A bounded `width × height` grid holding warehouses and delivery units.
///
/// Warehouses live in an immutable [`WarehouseIndex`]; unit positions and
/// statuses sit behind a single `RwLock` so concurrent dispatch tasks can
/// route and transition units safely.
pub struct GridWorld {
    width:  u32,
    height: u32,
    state:  RwLock<WorldState>,
}

impl GridWorld {
    /// An empty world, ready for [`WorldModel::populate`].
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, state: RwLock::new(WorldState::default()) }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn unit_count(&self) -> usize {
        self.state.read().units.len()
    }

    pub fn warehouse_count(&self) -> usize {
        self.state.read().index.len()
    }

    /// Snapshot of every warehouse, in ascending `WarehouseId` order.
    pub fn warehouses(&self) -> Vec<Warehouse> {
        self.state.read().index.all().to_vec()
    }

    fn random_cell(&self, rng: &mut SimRng) -> Coordinate {
        Coordinate::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    fn transition(&self, unit: UnitId, to: UnitStatus) -> WorldResult<()> {
        let mut state = self.state.write();
        let u = state.unit_mut(unit)?;
        if u.status != UnitStatus::Pending {
            return Err(WorldError::InvalidTransition { unit, from: u.status, to });
        }
        u.status = to;
        Ok(())
    }
}

impl WorldModel for GridWorld {
    fn populate(&self, warehouses: u32, units: u32, rng: &mut SimRng) -> WorldResult<()> {
        let mut state = self.state.write();
        if !state.units.is_empty() || !state.index.is_empty() {
            return Err(WorldError::AlreadyPopulated);
        }
        if warehouses == 0 && units > 0 {
            return Err(WorldError::NoWarehouses { units });
        }
        if warehouses as u64 > self.width as u64 * self.height as u64 {
            return Err(WorldError::GridTooSmall {
                count:  warehouses,
                width:  self.width,
                height: self.height,
            });
        }

        // Warehouses need distinct cells; units may share cells freely.
        let mut taken = FxHashSet::default();
        let mut placed = Vec::with_capacity(warehouses as usize);
        while placed.len() < warehouses as usize {
            let cell = self.random_cell(rng);
            if taken.insert(cell) {
                placed.push(Warehouse { id: WarehouseId(placed.len() as u32), position: cell });
            }
        }
        state.index = WarehouseIndex::build(placed);

        state.units = (0..units as usize)
            .map(|i| UnitState {
                name:     unit_name(i),
                position: self.random_cell(rng),
                status:   UnitStatus::Pending,
            })
            .collect();

        info!(
            warehouses,
            units,
            width = self.width,
            height = self.height,
            "World populated"
        );
        Ok(())
    }

    fn delivery_units(&self) -> Vec<DeliveryUnit> {
        let state = self.state.read();
        (0..state.units.len()).map(|i| state.snapshot(i)).collect()
    }

    fn advance_toward_nearest_warehouse(&self, unit: UnitId) -> WorldResult<Coordinate> {
        let mut state = self.state.write();
        let from = {
            let u = state.unit(unit)?;
            if u.status.is_terminal() {
                return Err(WorldError::InvalidTransition {
                    unit,
                    from: u.status,
                    to:   UnitStatus::Pending,
                });
            }
            u.position
        };
        let Some(target) = state.index.nearest(from).map(|w| w.position) else {
            return Err(WorldError::NoWarehouses { units: state.units.len() as u32 });
        };

        let to = from.step_toward(target);
        state.unit_mut(unit)?.position = to;
        debug!(%unit, from = %from, to = %to, target = %target, "Unit advanced");
        Ok(to)
    }

    fn find_entity_at(&self, at: Coordinate, kind: EntityKind) -> Option<Entity> {
        let state = self.state.read();
        match kind {
            EntityKind::Warehouse => state.index.at(at).copied().map(Entity::Warehouse),
            EntityKind::DeliveryUnit => state
                .units
                .iter()
                .position(|u| u.position == at)
                .map(|i| Entity::DeliveryUnit(state.snapshot(i))),
        }
    }

    fn unit_position(&self, unit: UnitId) -> WorldResult<Coordinate> {
        Ok(self.state.read().unit(unit)?.position)
    }

    fn unit_status(&self, unit: UnitId) -> WorldResult<UnitStatus> {
        Ok(self.state.read().unit(unit)?.status)
    }

    fn mark_arrived(&self, unit: UnitId) -> WorldResult<()> {
        self.transition(unit, UnitStatus::Arrived)
    }

    fn mark_stranded(&self, unit: UnitId) -> WorldResult<()> {
        self.transition(unit, UnitStatus::Stranded)
    }
}

// ── GridWorldBuilder ──────────────────────────────────────────────────────────

/// Builds a [`GridWorld`] with hand-placed warehouses and units.
///
/// Used by tests and scripted scenarios where random population would make
/// round counts unpredictable.
///
/// ```
/// use fleet_core::Coordinate;
/// use fleet_world::GridWorldBuilder;
///
/// let mut b = GridWorldBuilder::new(10, 10);
/// b.add_warehouse(Coordinate::new(0, 0));
/// let unit = b.add_unit(Coordinate::new(3, 0));
/// let world = b.build().unwrap();
/// assert_eq!(world.unit_count(), 1);
/// # let _ = unit;
/// ```
pub struct GridWorldBuilder {
    width:      u32,
    height:     u32,
    warehouses: Vec<Coordinate>,
    units:      Vec<(String, Coordinate)>,
}

impl GridWorldBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, warehouses: Vec::new(), units: Vec::new() }
    }

    pub fn add_warehouse(&mut self, at: Coordinate) -> WarehouseId {
        self.warehouses.push(at);
        WarehouseId(self.warehouses.len() as u32 - 1)
    }

    /// Add a unit with a generated display name.
    pub fn add_unit(&mut self, at: Coordinate) -> UnitId {
        let name = unit_name(self.units.len());
        self.add_named_unit(name, at)
    }

    pub fn add_named_unit(&mut self, name: impl Into<String>, at: Coordinate) -> UnitId {
        self.units.push((name.into(), at));
        UnitId(self.units.len() as u32 - 1)
    }

    /// Validate placement and freeze the warehouse index.
    pub fn build(self) -> WorldResult<GridWorld> {
        let (width, height) = (self.width, self.height);
        let in_bounds = |at: Coordinate| {
            if at.within(width, height) {
                Ok(())
            } else {
                Err(WorldError::OutOfBounds { at, width, height })
            }
        };

        if self.warehouses.is_empty() && !self.units.is_empty() {
            return Err(WorldError::NoWarehouses { units: self.units.len() as u32 });
        }

        let mut taken = FxHashSet::default();
        let mut warehouses = Vec::with_capacity(self.warehouses.len());
        for (i, &at) in self.warehouses.iter().enumerate() {
            in_bounds(at)?;
            if !taken.insert(at) {
                return Err(WorldError::CellOccupied(at));
            }
            warehouses.push(Warehouse { id: WarehouseId(i as u32), position: at });
        }

        let mut units = Vec::with_capacity(self.units.len());
        for (name, at) in self.units {
            in_bounds(at)?;
            units.push(UnitState { name, position: at, status: UnitStatus::Pending });
        }

        Ok(GridWorld {
            width,
            height,
            state: RwLock::new(WorldState { units, index: WarehouseIndex::build(warehouses) }),
        })
    }
}
