//! Plain-text rendering of the final report.
//!
//! ```text
//! Execution time: 1.204518ms
//! +----------------------+-------+--------+
//! | Operation            | Count | Errors |
//! +----------------------+-------+--------+
//! | MoveUnit             |     9 |      0 |
//! | UnitReachedWarehouse |     3 |      0 |
//! +----------------------+-------+--------+
//! ```

use std::fmt;

use fleet_dispatch::{FinalReport, OperationRow};

/// Header of the operations table.
pub const REPORT_HEADER: [&str; 3] = ["Operation", "Count", "Errors"];

/// A bordered table.  The first column is left-aligned, the others right.
#[derive(Debug, Clone, Default)]
pub struct AsciiTable {
    header: Vec<String>,
    rows:   Vec<Vec<String>>,
}

impl AsciiTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { header: header.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Append a row.  Short rows are padded with empty cells.
    pub fn add_row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for line in std::iter::once(&self.header).chain(&self.rows) {
            for (w, cell) in widths.iter_mut().zip(line) {
                *w = (*w).max(cell.chars().count());
            }
        }
        widths
    }
}

fn write_rule(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    f.write_str("+")?;
    for &w in widths {
        write!(f, "{}+", "-".repeat(w + 2))?;
    }
    f.write_str("\n")
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    f.write_str("|")?;
    for (i, &w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if i == 0 {
            write!(f, " {cell:<w$} |")?;
        } else {
            write!(f, " {cell:>w$} |")?;
        }
    }
    f.write_str("\n")
}

impl fmt::Display for AsciiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_rule(f, &widths)?;
        write_line(f, &widths, &self.header)?;
        write_rule(f, &widths)?;
        for row in &self.rows {
            write_line(f, &widths, row)?;
        }
        write_rule(f, &widths)
    }
}

/// The operations table: one row per operation.
pub fn operations_table(rows: &[OperationRow]) -> AsciiTable {
    let mut table = AsciiTable::new(REPORT_HEADER);
    for row in rows {
        table.add_row([
            row.operation.as_str().to_owned(),
            row.attempts.to_string(),
            row.errors.to_string(),
        ]);
    }
    table
}

/// Render the whole report: execution time, then the operations table.
/// A trailing line notes partial completion when units are left over.
pub fn render_report(report: &FinalReport) -> String {
    let mut out = format!("Execution time: {:?}\n", report.elapsed);
    out.push_str(&operations_table(&report.rows).to_string());
    if !report.completed() || report.stranded > 0 {
        out.push_str(&format!(
            "Stopped after {} rounds: {} arrived, {} stranded, {} pending of {}\n",
            report.rounds, report.arrived, report.stranded, report.pending, report.total
        ));
    }
    out
}
