//! Plain data row types written by output backends.

use fleet_dispatch::{OperationRow, RoundSummary};

/// One line per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummaryRow {
    pub round:          u64,
    pub dispatched:     u64,
    pub moved:          u64,
    pub arrived:        u64,
    pub failed:         u64,
    pub anomalies:      u64,
    pub stranded:       u64,
    /// Microseconds since the driver was built.
    pub elapsed_micros: u64,
}

impl From<&RoundSummary> for RoundSummaryRow {
    fn from(s: &RoundSummary) -> Self {
        Self {
            round:          s.round,
            dispatched:     s.dispatched as u64,
            moved:          s.moved as u64,
            arrived:        s.arrived as u64,
            failed:         s.failed as u64,
            anomalies:      s.anomalies as u64,
            stranded:       s.stranded as u64,
            elapsed_micros: s.elapsed.as_micros() as u64,
        }
    }
}

/// Final counters for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationStatsRow {
    pub operation: &'static str,
    pub attempts:  u64,
    pub errors:    u64,
}

impl From<&OperationRow> for OperationStatsRow {
    fn from(r: &OperationRow) -> Self {
        Self { operation: r.operation.as_str(), attempts: r.attempts, errors: r.errors }
    }
}
