//! `MemoryTracker` — an in-process [`TrackingClient`] that records every
//! call and can be told to fail specific attempts.
//!
//! Used by the test suites and by offline runs of the demo binary.
//!
//! ```
//! use fleet_core::UnitId;
//! use fleet_transport::MemoryTracker;
//!
//! // The first arrival report for unit 0 fails; later ones succeed.
//! let tracker = MemoryTracker::new().fail_arrival_attempt(UnitId(0), 1);
//! assert_eq!(tracker.disconnect_count(), 0);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tokio_util::sync::CancellationToken;

use fleet_core::{Coordinate, UnitId};

use crate::{cancellable, ArrivalReport, TrackingClient, TransportError, TransportResult};

/// One report call observed by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCall {
    Move { unit: UnitId, at: Coordinate, ok: bool },
    Arrival { report: ArrivalReport, ok: bool },
}

impl ReportCall {
    pub fn unit(&self) -> UnitId {
        match self {
            ReportCall::Move { unit, .. } => *unit,
            ReportCall::Arrival { report, .. } => report.unit,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            ReportCall::Move { ok, .. } | ReportCall::Arrival { ok, .. } => *ok,
        }
    }
}

/// Which calls to fail.  Attempt numbers are 1-based and counted per unit.
#[derive(Default)]
struct FailurePlan {
    move_attempts:    FxHashMap<UnitId, FxHashSet<u32>>,
    arrival_attempts: FxHashMap<UnitId, FxHashSet<u32>>,
    always_moves:     FxHashSet<UnitId>,
    always_arrivals:  FxHashSet<UnitId>,
    refuse_connect:   bool,
}

impl FailurePlan {
    fn fails(
        attempts: &FxHashMap<UnitId, FxHashSet<u32>>,
        always:   &FxHashSet<UnitId>,
        unit:     UnitId,
        attempt:  u32,
    ) -> bool {
        always.contains(&unit) || attempts.get(&unit).is_some_and(|s| s.contains(&attempt))
    }
}

#[derive(Default)]
struct TrackerState {
    connected:      bool,
    address:        Option<String>,
    connects:       u32,
    disconnects:    u32,
    calls:          Vec<ReportCall>,
    move_counts:    FxHashMap<UnitId, u32>,
    arrival_counts: FxHashMap<UnitId, u32>,
}

/// Recording [`TrackingClient`] with deterministic fault injection.
#[derive(Default)]
pub struct MemoryTracker {
    state:   Mutex<TrackerState>,
    plan:    FailurePlan,
    latency: Duration,
}

impl MemoryTracker {
    /// A disconnected tracker that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Delay every report call by `latency` (cancellation still wins).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail the `attempt`-th movement report for `unit`.
    pub fn fail_move_attempt(mut self, unit: UnitId, attempt: u32) -> Self {
        self.plan.move_attempts.entry(unit).or_default().insert(attempt);
        self
    }

    /// Fail the `attempt`-th arrival report for `unit`.
    pub fn fail_arrival_attempt(mut self, unit: UnitId, attempt: u32) -> Self {
        self.plan.arrival_attempts.entry(unit).or_default().insert(attempt);
        self
    }

    /// Fail every movement report for `unit`.
    pub fn fail_all_moves(mut self, unit: UnitId) -> Self {
        self.plan.always_moves.insert(unit);
        self
    }

    /// Fail every arrival report for `unit`.
    pub fn fail_all_arrivals(mut self, unit: UnitId) -> Self {
        self.plan.always_arrivals.insert(unit);
        self
    }

    /// Make [`connect`][TrackingClient::connect] time out.
    pub fn refuse_connections(mut self) -> Self {
        self.plan.refuse_connect = true;
        self
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Every report call so far, in the order they were answered.
    pub fn calls(&self) -> Vec<ReportCall> {
        self.state.lock().calls.clone()
    }

    /// Movement reports issued for `unit`, successful or not.
    pub fn move_calls(&self, unit: UnitId) -> u32 {
        self.state.lock().move_counts.get(&unit).copied().unwrap_or(0)
    }

    /// Arrival reports issued for `unit`, successful or not.
    pub fn arrival_calls(&self, unit: UnitId) -> u32 {
        self.state.lock().arrival_counts.get(&unit).copied().unwrap_or(0)
    }

    /// Arrival reports for `unit` that were accepted.
    pub fn accepted_arrivals(&self, unit: UnitId) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ReportCall::Arrival { report, ok: true } if report.unit == unit))
            .count()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn address(&self) -> Option<String> {
        self.state.lock().address.clone()
    }

    pub fn connect_count(&self) -> u32 {
        self.state.lock().connects
    }

    /// Number of times `disconnect` was invoked, including failed calls.
    pub fn disconnect_count(&self) -> u32 {
        self.state.lock().disconnects
    }

    // ── Internals ─────────────────────────────────────────────────────────

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn record_move(&self, unit: UnitId, at: Coordinate) -> TransportResult<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        let attempt = {
            let n = state.move_counts.entry(unit).or_default();
            *n += 1;
            *n
        };
        let fail = FailurePlan::fails(&self.plan.move_attempts, &self.plan.always_moves, unit, attempt);
        state.calls.push(ReportCall::Move { unit, at, ok: !fail });
        if fail {
            return Err(TransportError::Injected(format!("MoveUnit attempt {attempt} for {unit}")));
        }
        Ok(())
    }

    fn record_arrival(&self, report: &ArrivalReport) -> TransportResult<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        let unit = report.unit;
        let attempt = {
            let n = state.arrival_counts.entry(unit).or_default();
            *n += 1;
            *n
        };
        let fail = FailurePlan::fails(
            &self.plan.arrival_attempts,
            &self.plan.always_arrivals,
            unit,
            attempt,
        );
        state.calls.push(ReportCall::Arrival { report: report.clone(), ok: !fail });
        if fail {
            return Err(TransportError::Injected(format!(
                "UnitReachedWarehouse attempt {attempt} for {unit}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackingClient for MemoryTracker {
    async fn connect(&self, address: &str, deadline: Duration) -> TransportResult<()> {
        if self.plan.refuse_connect {
            return Err(TransportError::ConnectTimeout {
                address: address.to_owned(),
                timeout: deadline,
            });
        }
        let mut state = self.state.lock();
        state.connected = true;
        state.connects += 1;
        state.address = Some(address.to_owned());
        Ok(())
    }

    async fn disconnect(&self) -> TransportResult<()> {
        let mut state = self.state.lock();
        state.disconnects += 1;
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        state.connected = false;
        Ok(())
    }

    async fn report_move(
        &self,
        cancel: &CancellationToken,
        unit:   UnitId,
        at:     Coordinate,
    ) -> TransportResult<()> {
        cancellable(cancel, async {
            self.delay().await;
            self.record_move(unit, at)
        })
        .await
    }

    async fn report_arrival(
        &self,
        cancel: &CancellationToken,
        report: &ArrivalReport,
    ) -> TransportResult<()> {
        cancellable(cancel, async {
            self.delay().await;
            self.record_arrival(report)
        })
        .await
    }
}
