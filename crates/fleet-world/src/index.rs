//! Warehouse spatial index.
//!
//! An R-tree (via `rstar`) answers "nearest warehouse to this cell" and an
//! `FxHashMap` answers "which warehouse sits exactly on this cell".  Both
//! are built once at population time and never mutated afterwards.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use fleet_core::{Coordinate, WarehouseId};

use crate::Warehouse;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its `WarehouseId`.
#[derive(Clone)]
struct WarehouseEntry {
    point: [i64; 2],
    id:    WarehouseId,
}

impl RTreeObject for WarehouseEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for WarehouseEntry {
    /// Squared Euclidean distance on the grid.
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[inline]
fn to_point(c: Coordinate) -> [i64; 2] {
    [c.x as i64, c.y as i64]
}

// ── WarehouseIndex ────────────────────────────────────────────────────────────

/// Read-only lookup structure over all warehouses.
pub struct WarehouseIndex {
    warehouses: Vec<Warehouse>,
    by_cell:    FxHashMap<Coordinate, WarehouseId>,
    spatial:    RTree<WarehouseEntry>,
}

impl WarehouseIndex {
    /// An index with no warehouses.
    pub fn empty() -> Self {
        Self {
            warehouses: Vec::new(),
            by_cell:    FxHashMap::default(),
            spatial:    RTree::new(),
        }
    }

    /// Bulk-load the index.  `warehouses[i].id` must equal `WarehouseId(i)`
    /// and positions must be distinct.
    pub fn build(warehouses: Vec<Warehouse>) -> Self {
        let entries: Vec<WarehouseEntry> = warehouses
            .iter()
            .map(|w| WarehouseEntry { point: to_point(w.position), id: w.id })
            .collect();
        let by_cell = warehouses.iter().map(|w| (w.position, w.id)).collect();
        Self {
            spatial: RTree::bulk_load(entries),
            by_cell,
            warehouses,
        }
    }

    pub fn len(&self) -> usize {
        self.warehouses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warehouses.is_empty()
    }

    pub fn all(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn get(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.get(id.index())
    }

    /// The warehouse occupying exactly `at`, if any.
    pub fn at(&self, at: Coordinate) -> Option<&Warehouse> {
        self.by_cell.get(&at).and_then(|&id| self.get(id))
    }

    /// The warehouse closest to `from` (Euclidean).  `None` when empty.
    pub fn nearest(&self, from: Coordinate) -> Option<&Warehouse> {
        self.spatial
            .nearest_neighbor(&to_point(from))
            .and_then(|e| self.get(e.id))
    }
}

impl Default for WarehouseIndex {
    fn default() -> Self {
        Self::empty()
    }
}
