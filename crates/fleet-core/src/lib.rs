//! `fleet-core` — foundational types for the `rust_fleet` dispatch engine.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `UnitId`, `WarehouseId`                                |
//! | [`geo`]      | `Coordinate`, grid stepping and distances              |
//! | [`status`]   | `UnitStatus` (`Pending` / `Arrived` / `Stranded`)      |
//! | [`config`]   | `FleetConfig`, `PacingMode`                            |
//! | [`rng`]      | `UnitRng` (per-unit), `SimRng` (global)                |
//! | [`error`]    | `FleetError`, `FleetResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod status;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FleetConfig, PacingMode};
pub use error::{FleetError, FleetResult};
pub use geo::Coordinate;
pub use ids::{UnitId, WarehouseId};
pub use rng::{SimRng, UnitRng};
pub use status::UnitStatus;
