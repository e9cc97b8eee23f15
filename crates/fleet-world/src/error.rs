//! World-model error type.

use thiserror::Error;

use fleet_core::{Coordinate, UnitId, UnitStatus};

/// Errors produced by `fleet-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("world is already populated")]
    AlreadyPopulated,

    #[error("cannot route {units} units without any warehouse")]
    NoWarehouses { units: u32 },

    #[error("{count} warehouses do not fit on a {width}x{height} grid")]
    GridTooSmall { count: u32, width: u32, height: u32 },

    #[error("coordinate ({at}) lies outside the {width}x{height} grid")]
    OutOfBounds { at: Coordinate, width: u32, height: u32 },

    #[error("a warehouse already occupies ({0})")]
    CellOccupied(Coordinate),

    #[error("unit {unit} cannot go from {from} to {to}")]
    InvalidTransition { unit: UnitId, from: UnitStatus, to: UnitStatus },
}

pub type WorldResult<T> = Result<T, WorldError>;
