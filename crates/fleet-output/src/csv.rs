//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `round_summaries.csv`
//! - `operation_stats.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OperationStatsRow, OutputResult, RoundSummaryRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    rounds:     Writer<File>,
    operations: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files, and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut rounds = Writer::from_path(dir.join("round_summaries.csv"))?;
        rounds.write_record([
            "round",
            "dispatched",
            "moved",
            "arrived",
            "failed",
            "anomalies",
            "stranded",
            "elapsed_micros",
        ])?;

        let mut operations = Writer::from_path(dir.join("operation_stats.csv"))?;
        operations.write_record(["operation", "count", "errors"])?;

        Ok(Self { rounds, operations, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        self.rounds.write_record(&[
            row.round.to_string(),
            row.dispatched.to_string(),
            row.moved.to_string(),
            row.arrived.to_string(),
            row.failed.to_string(),
            row.anomalies.to_string(),
            row.stranded.to_string(),
            row.elapsed_micros.to_string(),
        ])?;
        Ok(())
    }

    fn write_operation_stats(&mut self, rows: &[OperationStatsRow]) -> OutputResult<()> {
        for row in rows {
            self.operations.write_record(&[
                row.operation.to_owned(),
                row.attempts.to_string(),
                row.errors.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.rounds.flush()?;
        self.operations.flush()?;
        Ok(())
    }
}
