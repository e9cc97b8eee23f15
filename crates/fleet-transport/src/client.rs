//! The `TrackingClient` trait.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use fleet_core::{Coordinate, UnitId, WarehouseId};

use crate::{TransportError, TransportResult};

/// Payload of an arrival report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalReport {
    pub unit:       UnitId,
    pub warehouse:  WarehouseId,
    pub coordinate: Coordinate,
    /// Human-readable announcement shown by the tracking service.
    pub message:    String,
}

/// Connection to the remote tracking service.
///
/// # Thread safety
///
/// One client is shared by every dispatch task of a round, so
/// implementations must be `Send + Sync` and keep connection state behind
/// interior mutability.
#[async_trait]
pub trait TrackingClient: Send + Sync + 'static {
    /// Establish the connection, failing if it is not up within `deadline`.
    async fn connect(&self, address: &str, deadline: Duration) -> TransportResult<()>;

    /// Release the connection.  Later report calls fail with
    /// [`TransportError::NotConnected`].
    async fn disconnect(&self) -> TransportResult<()>;

    /// Report that `unit` is now at `at`.
    async fn report_move(
        &self,
        cancel: &CancellationToken,
        unit:   UnitId,
        at:     Coordinate,
    ) -> TransportResult<()>;

    /// Report that a unit reached a warehouse.
    async fn report_arrival(
        &self,
        cancel: &CancellationToken,
        report: &ArrivalReport,
    ) -> TransportResult<()>;
}

/// Race `fut` against `cancel`.  Cancellation wins ties, so a call issued
/// after shutdown never reaches the network.
pub async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> TransportResult<T>
where
    F: Future<Output = TransportResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        result = fut => result,
    }
}
