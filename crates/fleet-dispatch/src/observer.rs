//! Driver observer trait for progress reporting and data collection.

use std::time::Duration;

use crate::FinalReport;

/// What happened in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round:      u64,
    /// Tasks spawned (one per pending unit).
    pub dispatched: usize,
    pub moved:      usize,
    pub arrived:    usize,
    /// Failed movement or arrival reports.
    pub failed:     usize,
    /// Units that stood still on a cell without a warehouse.
    pub anomalies:  usize,
    /// Units stranded at the end of this round.
    pub stranded:   usize,
    /// Wall-clock time since the driver was built.
    pub elapsed:    Duration,
}

/// Callbacks invoked by [`Driver::run`][crate::Driver::run] at round
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl DriverObserver for Progress {
///     fn on_round_end(&mut self, summary: &RoundSummary) {
///         println!("round {}: {} arrived", summary.round, summary.arrived);
///     }
/// }
/// ```
pub trait DriverObserver {
    /// Called before the round's tasks are spawned.
    fn on_round_start(&mut self, _round: u64, _pending: usize) {}

    /// Called after every task of the round has finished.
    fn on_round_end(&mut self, _summary: &RoundSummary) {}

    /// Called once when the run stops, with the report `run` returns.
    /// Not called when the run is cancelled.
    fn on_run_end(&mut self, _report: &FinalReport) {}
}

/// A [`DriverObserver`] that does nothing.
pub struct NoopObserver;

impl DriverObserver for NoopObserver {}
