//! `fleet-output` — reporting for the rust_fleet dispatch engine.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`table`]    | `AsciiTable`, `render_report` — the printed final report   |
//! | [`csv`]      | `CsvWriter` — `round_summaries.csv`, `operation_stats.csv` |
//! | [`observer`] | `RunOutputObserver` — drives a writer from the round loop  |
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleet_output::{render_report, CsvWriter, RunOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = RunOutputObserver::new(writer);
//! let report = driver.run(&mut obs).await?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! print!("{}", render_report(&report));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod table;
pub mod writer;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RunOutputObserver;
pub use row::{OperationStatsRow, RoundSummaryRow};
pub use table::{operations_table, render_report, AsciiTable, REPORT_HEADER};
pub use writer::OutputWriter;
