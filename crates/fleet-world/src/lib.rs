//! `fleet-world` — the in-memory world the dispatch engine moves units through.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`entity`]  | `DeliveryUnit`, `Warehouse`, `Entity`, `EntityKind`          |
//! | [`index`]   | `WarehouseIndex` — R-tree + exact-cell lookup                |
//! | [`model`]   | `WorldModel` trait consumed by `fleet-dispatch`              |
//! | [`grid`]    | `GridWorld` (the default model), `GridWorldBuilder`          |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                               |
//!
//! # Movement model
//!
//! Each call to [`WorldModel::advance_toward_nearest_warehouse`] moves a unit
//! one cell (eight-neighbourhood) toward the warehouse nearest to its current
//! position.  A unit already on a warehouse cell stays put, which is how the
//! dispatch engine detects arrival.

pub mod entity;
pub mod error;
pub mod grid;
pub mod index;
pub mod model;


pub use entity::{DeliveryUnit, Entity, EntityKind, Warehouse};
pub use error::{WorldError, WorldResult};
pub use grid::{GridWorld, GridWorldBuilder};
pub use index::WarehouseIndex;
pub use model::WorldModel;
