//! The `OutputWriter` trait implemented by backend writers.

use crate::{OperationStatsRow, OutputResult, RoundSummaryRow};

/// Sink for per-round and end-of-run rows.
///
/// Driven by [`RunOutputObserver`][crate::RunOutputObserver], which stores
/// errors instead of interrupting the run.
pub trait OutputWriter {
    /// Write one round summary row.
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()>;

    /// Write the final per-operation counters.
    fn write_operation_stats(&mut self, rows: &[OperationStatsRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}
