//! Entities placed on the grid.

use fleet_core::{Coordinate, UnitId, UnitStatus, WarehouseId};

/// A delivery unit as seen from outside the world model.
///
/// Values returned by [`WorldModel`][crate::WorldModel] are snapshots; the
/// authoritative position and status stay inside the model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryUnit {
    pub id:       UnitId,
    pub name:     String,
    pub position: Coordinate,
    pub status:   UnitStatus,
}

/// A warehouse.  Immutable once the world is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warehouse {
    pub id:       WarehouseId,
    pub position: Coordinate,
}

/// Which kind of entity a coordinate lookup is interested in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    Warehouse,
    DeliveryUnit,
}

/// Result of [`WorldModel::find_entity_at`][crate::WorldModel::find_entity_at].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Warehouse(Warehouse),
    DeliveryUnit(DeliveryUnit),
}

impl Entity {
    /// The warehouse, if this entity is one.
    pub fn as_warehouse(&self) -> Option<&Warehouse> {
        match self {
            Entity::Warehouse(w) => Some(w),
            Entity::DeliveryUnit(_) => None,
        }
    }
}
