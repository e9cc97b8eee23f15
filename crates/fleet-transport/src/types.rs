//! Request bodies sent to the tracking service.

use serde::Serialize;

use fleet_core::Coordinate;

use crate::ArrivalReport;

/// A grid position on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub x: u32,
    pub y: u32,
}

impl From<Coordinate> for Location {
    fn from(c: Coordinate) -> Self {
        Self { x: c.x, y: c.y }
    }
}

/// Body of a movement report.
#[derive(Debug, Serialize)]
pub struct MoveUnitRequest {
    pub cargo_unit_id: i64,
    pub location: Location,
}

/// Arrival details shown by the tracking service.
#[derive(Debug, Serialize)]
pub struct WarehouseAnnouncement {
    pub cargo_unit_id: i64,
    pub warehouse_id: i64,
    pub message: String,
}

/// Body of an arrival report.
#[derive(Debug, Serialize)]
pub struct UnitReachedWarehouseRequest {
    pub location: Location,
    pub announcement: WarehouseAnnouncement,
}

impl From<&ArrivalReport> for UnitReachedWarehouseRequest {
    fn from(r: &ArrivalReport) -> Self {
        Self {
            location: r.coordinate.into(),
            announcement: WarehouseAnnouncement {
                cargo_unit_id: r.unit.0 as i64,
                warehouse_id: r.warehouse.0 as i64,
                message: r.message.clone(),
            },
        }
    }
}
