use fleet_core::FleetError;
use fleet_transport::TransportError;
use fleet_world::WorldError;
use thiserror::Error;

/// Errors that stop a run.
///
/// Per-unit failures (rejected reports, routing anomalies) never surface
/// here; they are counted and the unit is retried next round.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch configuration error: {0}")]
    Config(#[from] FleetError),

    #[error("world model error: {0}")]
    World(#[from] WorldError),

    #[error("could not connect to the tracking service: {0}")]
    Connect(#[from] TransportError),

    #[error("run cancelled after {rounds} rounds")]
    Cancelled { rounds: u64 },

    #[error("delivery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
