//! JSON-over-HTTP tracking client.
//!
//! | Operation      | Request                                           |
//! |----------------|---------------------------------------------------|
//! | connect probe  | `GET  {base}` (any HTTP response counts as up)    |
//! | movement       | `POST {base}api/v1/move-unit`                     |
//! | arrival        | `POST {base}api/v1/unit-reached-warehouse`        |
//!
//! Non-2xx responses become [`TransportError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Url;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use fleet_core::{Coordinate, UnitId};

use crate::types::{MoveUnitRequest, UnitReachedWarehouseRequest};
use crate::{cancellable, ArrivalReport, TrackingClient, TransportError, TransportResult};

const MOVE_UNIT_PATH: &str = "api/v1/move-unit";
const UNIT_REACHED_WAREHOUSE_PATH: &str = "api/v1/unit-reached-warehouse";

#[derive(Clone)]
struct Connection {
    http: reqwest::Client,
    base: Url,
}

/// [`TrackingClient`] speaking JSON over HTTP.
#[derive(Default)]
pub struct HttpTrackingClient {
    conn: RwLock<Option<Connection>>,
}

impl HttpTrackingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.read().is_some()
    }

    fn connection(&self) -> TransportResult<Connection> {
        self.conn.read().clone().ok_or(TransportError::NotConnected)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        path:      &str,
        body:      &B,
    ) -> TransportResult<()> {
        let conn = self.connection()?;
        let url = conn
            .base
            .join(path)
            .map_err(|e| TransportError::InvalidAddress(e.to_string()))?;
        let response = conn.http.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected { operation, status: status.as_u16() });
        }
        Ok(())
    }
}

/// Parse `address` into a base URL ending in `/`.  A bare `host:port`
/// defaults to plain HTTP.
pub(crate) fn parse_base(address: &str) -> TransportResult<Url> {
    let trimmed = address.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };
    let mut url = Url::parse(&with_scheme)
        .map_err(|e| TransportError::InvalidAddress(format!("{address}: {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl TrackingClient for HttpTrackingClient {
    async fn connect(&self, address: &str, deadline: Duration) -> TransportResult<()> {
        let base = parse_base(address)?;
        let http = reqwest::Client::builder().connect_timeout(deadline).build()?;

        let probe = tokio::time::timeout(deadline, http.get(base.clone()).send()).await;
        match probe {
            Err(_) => {
                return Err(TransportError::ConnectTimeout {
                    address: address.to_owned(),
                    timeout: deadline,
                });
            }
            Ok(Err(e)) => return Err(e.into()),
            Ok(Ok(response)) => {
                debug!(status = response.status().as_u16(), "Tracking service probe answered");
            }
        }

        *self.conn.write() = Some(Connection { http, base });
        info!(address, "Connected to tracking service");
        Ok(())
    }

    async fn disconnect(&self) -> TransportResult<()> {
        let previous = self.conn.write().take();
        match previous {
            Some(_) => {
                info!("Disconnected from tracking service");
                Ok(())
            }
            None => Err(TransportError::NotConnected),
        }
    }

    async fn report_move(
        &self,
        cancel: &CancellationToken,
        unit:   UnitId,
        at:     Coordinate,
    ) -> TransportResult<()> {
        let body = MoveUnitRequest { cargo_unit_id: unit.0 as i64, location: at.into() };
        cancellable(cancel, self.post("MoveUnit", MOVE_UNIT_PATH, &body)).await
    }

    async fn report_arrival(
        &self,
        cancel: &CancellationToken,
        report: &ArrivalReport,
    ) -> TransportResult<()> {
        let body = UnitReachedWarehouseRequest::from(report);
        cancellable(
            cancel,
            self.post("UnitReachedWarehouse", UNIT_REACHED_WAREHOUSE_PATH, &body),
        )
        .await
    }
}
