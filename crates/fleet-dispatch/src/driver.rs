//! The `Driver` struct and its round loop.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fleet_core::{FleetConfig, UnitId, UnitStatus};
use fleet_transport::TrackingClient;
use fleet_world::WorldModel;

use crate::pacing::PacingController;
use crate::stats::{Operation, OperationRow, StatisticsRecorder};
use crate::task::{DeliveryTask, TaskOutcome, TaskReport};
use crate::{DispatchError, DispatchResult, DriverObserver, RoundSummary};

// ── FinalReport ───────────────────────────────────────────────────────────────

/// Everything a run produced, handed to the reporter when the loop stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    /// Wall-clock time since the driver was built.
    pub elapsed:  Duration,
    /// Rounds executed.
    pub rounds:   u64,
    /// One row per operation, in report order.
    pub rows:     Vec<OperationRow>,
    pub total:    usize,
    pub arrived:  usize,
    pub stranded: usize,
    /// Units still pending; non-zero only when the round limit stopped the run.
    pub pending:  usize,
}

impl FinalReport {
    /// `true` when no unit is left pending.
    #[inline]
    pub fn completed(&self) -> bool {
        self.pending == 0
    }

    pub fn row(&self, operation: Operation) -> Option<&OperationRow> {
        self.rows.iter().find(|r| r.operation == operation)
    }
}

// ── Per-unit bookkeeping ──────────────────────────────────────────────────────

pub(crate) struct UnitSlot {
    pub(crate) id:       UnitId,
    pub(crate) name:     Arc<str>,
    /// Absent only while the unit's task is running.
    pub(crate) pacing:   Option<PacingController>,
    /// Consecutive failed attempts.
    pub(crate) failures: u32,
}

/// Units partitioned by their current status.
struct Census {
    pending:  Vec<usize>,
    arrived:  usize,
    stranded: usize,
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// The dispatch engine.
///
/// `Driver<W, C>` repeats rounds until no unit is pending:
///
/// 1. **Census**: query every unit's status through the world model.
/// 2. **Fan-out**: spawn one [`DeliveryTask`] per pending unit.
/// 3. **Barrier**: wait for all of them.
/// 4. **Settle**: take back pacing state and strand units that exhausted
///    their failure budget.
///
/// Create via [`DriverBuilder`][crate::DriverBuilder].
pub struct Driver<W: WorldModel, C: TrackingClient> {
    pub(crate) config:  FleetConfig,
    pub(crate) world:   Arc<W>,
    pub(crate) client:  Arc<C>,
    pub(crate) stats:   Arc<StatisticsRecorder>,
    pub(crate) cancel:  CancellationToken,
    /// Unit list taken from the world once, at build time.
    pub(crate) units:   Vec<UnitSlot>,
    pub(crate) slot_of: FxHashMap<UnitId, usize>,
    pub(crate) rounds:  u64,
    pub(crate) started: Instant,
}

impl<W: WorldModel, C: TrackingClient> Driver<W, C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run rounds until every unit is `Arrived` or `Stranded`, or until
    /// `config.max_rounds` rounds have run.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Cancelled`] once the cancellation token fires; no
    /// report is produced in that case.  World model failures during the
    /// census and panicked tasks also end the run.
    pub async fn run<O: DriverObserver>(&mut self, observer: &mut O) -> DispatchResult<FinalReport> {
        info!(
            units  = self.units.len(),
            pacing = %self.config.pacing_mode,
            "Dispatch started"
        );

        loop {
            if self.cancel.is_cancelled() {
                info!(rounds = self.rounds, "Dispatch cancelled");
                return Err(DispatchError::Cancelled { rounds: self.rounds });
            }

            let census = self.census()?;
            if census.pending.is_empty() {
                break;
            }
            if let Some(max) = self.config.max_rounds {
                if self.rounds >= max {
                    warn!(
                        rounds  = self.rounds,
                        pending = census.pending.len(),
                        "Round limit reached"
                    );
                    break;
                }
            }

            self.rounds += 1;
            observer.on_round_start(self.rounds, census.pending.len());
            let reports = self.run_round(&census.pending).await?;
            let summary = self.settle(reports)?;
            debug!(
                round   = summary.round,
                moved   = summary.moved,
                arrived = summary.arrived,
                failed  = summary.failed,
                "Round finished"
            );
            observer.on_round_end(&summary);
        }

        let report = self.report()?;
        info!(
            rounds   = report.rounds,
            arrived  = report.arrived,
            stranded = report.stranded,
            pending  = report.pending,
            elapsed  = ?report.elapsed,
            "Dispatch finished"
        );
        observer.on_run_end(&report);
        Ok(report)
    }

    /// Rounds executed so far.
    #[inline]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    #[inline]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn statistics(&self) -> &Arc<StatisticsRecorder> {
        &self.stats
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn world(&self) -> &Arc<W> {
        &self.world
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    // ── Round processing ──────────────────────────────────────────────────

    fn census(&self) -> DispatchResult<Census> {
        let mut census = Census { pending: Vec::new(), arrived: 0, stranded: 0 };
        for (i, slot) in self.units.iter().enumerate() {
            match self.world.unit_status(slot.id)? {
                UnitStatus::Pending  => census.pending.push(i),
                UnitStatus::Arrived  => census.arrived += 1,
                UnitStatus::Stranded => census.stranded += 1,
            }
        }
        Ok(census)
    }

    /// Spawn one task per pending slot and wait for all of them.
    async fn run_round(&mut self, pending: &[usize]) -> DispatchResult<Vec<TaskReport>> {
        let mut tasks = JoinSet::new();
        for &i in pending {
            let slot = &mut self.units[i];
            let Some(pacing) = slot.pacing.take() else {
                continue;
            };
            let task = DeliveryTask::new(
                slot.id,
                Arc::clone(&slot.name),
                Arc::clone(&self.world),
                Arc::clone(&self.client),
                Arc::clone(&self.stats),
                self.cancel.clone(),
                pacing,
            );
            tasks.spawn(task.run());
        }

        let mut reports = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            reports.push(joined?);
        }
        Ok(reports)
    }

    /// Fold the round's outcomes back into per-unit state.
    fn settle(&mut self, reports: Vec<TaskReport>) -> DispatchResult<RoundSummary> {
        let mut summary = RoundSummary {
            round:      self.rounds,
            dispatched: reports.len(),
            ..RoundSummary::default()
        };

        for report in reports {
            let Some(&i) = self.slot_of.get(&report.unit) else {
                continue;
            };
            let slot = &mut self.units[i];
            slot.pacing = Some(report.pacing);

            match report.outcome {
                TaskOutcome::Moved { .. } => summary.moved += 1,
                TaskOutcome::Arrived { .. } => summary.arrived += 1,
                TaskOutcome::MoveReportFailed | TaskOutcome::ArrivalReportFailed { .. } => {
                    summary.failed += 1
                }
                TaskOutcome::RoutingAnomaly { .. } => summary.anomalies += 1,
                TaskOutcome::WorldRejected => {}
            }

            if report.outcome.is_progress() {
                slot.failures = 0;
            } else if report.outcome.is_failure() {
                slot.failures += 1;
                if let Some(limit) = self.config.max_unit_failures {
                    if slot.failures >= limit {
                        self.world.mark_stranded(slot.id)?;
                        warn!(unit = %slot.id, failures = slot.failures, "Unit stranded");
                        summary.stranded += 1;
                    }
                }
            }
        }

        summary.elapsed = self.started.elapsed();
        Ok(summary)
    }

    fn report(&self) -> DispatchResult<FinalReport> {
        let census = self.census()?;
        Ok(FinalReport {
            elapsed:  self.started.elapsed(),
            rounds:   self.rounds,
            rows:     self.stats.snapshot(),
            total:    self.units.len(),
            arrived:  census.arrived,
            stranded: census.stranded,
            pending:  census.pending.len(),
        })
    }
}
