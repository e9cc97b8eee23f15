//! `RunOutputObserver<W>` — bridges `DriverObserver` to an `OutputWriter`.

use fleet_dispatch::{DriverObserver, FinalReport, RoundSummary};

use crate::row::{OperationStatsRow, RoundSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`DriverObserver`] that writes round summaries and the final operation
/// counters to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `DriverObserver`
/// methods have no return value.  After `driver.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct RunOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RunOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).  `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> DriverObserver for RunOutputObserver<W> {
    fn on_round_end(&mut self, summary: &RoundSummary) {
        let result = self.writer.write_round_summary(&RoundSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_run_end(&mut self, report: &FinalReport) {
        let rows: Vec<OperationStatsRow> = report.rows.iter().map(OperationStatsRow::from).collect();
        let result = self.writer.write_operation_stats(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
