//! Per-operation attempt and error counters.
//!
//! Every delivery task of a round writes into the same
//! [`StatisticsRecorder`], so counters are plain atomics.  An error is
//! always recorded after its attempt, and [`StatisticsRecorder::snapshot`]
//! loads `errors` before `attempts`; together with acquire/release
//! ordering this keeps `errors <= attempts` in every snapshot, even one
//! taken mid-round.

use std::sync::atomic::{AtomicU64, Ordering};

/// The remote calls the engine keeps statistics for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operation {
    MoveUnit,
    UnitReachedWarehouse,
}

impl Operation {
    /// All operations, in report order.
    pub const ALL: [Operation; 2] = [Operation::MoveUnit, Operation::UnitReachedWarehouse];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::MoveUnit             => "MoveUnit",
            Operation::UnitReachedWarehouse => "UnitReachedWarehouse",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── OperationCounter ──────────────────────────────────────────────────────────

/// Monotonic attempt/error pair for one operation.
#[derive(Debug, Default)]
pub struct OperationCounter {
    attempts: AtomicU64,
    errors:   AtomicU64,
}

impl OperationCounter {
    #[inline]
    fn attempt(&self) {
        self.attempts.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    fn error(&self) {
        self.errors.fetch_add(1, Ordering::AcqRel);
    }

    /// `(attempts, errors)`, loading errors first.
    fn load(&self) -> (u64, u64) {
        let errors = self.errors.load(Ordering::Acquire);
        let attempts = self.attempts.load(Ordering::Acquire);
        (attempts, errors)
    }
}

/// One line of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRow {
    pub operation: Operation,
    pub attempts:  u64,
    pub errors:    u64,
}

impl OperationRow {
    /// Attempts that succeeded.
    #[inline]
    pub fn successes(&self) -> u64 {
        self.attempts - self.errors
    }
}

// ── StatisticsRecorder ────────────────────────────────────────────────────────

/// Counters for every [`Operation`], all starting at zero.
#[derive(Debug, Default)]
pub struct StatisticsRecorder {
    counters: [OperationCounter; 2],
}

impl StatisticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self, op: Operation) {
        self.counters[op.index()].attempt();
    }

    /// Record that an attempt of `op` failed.  Call only after the matching
    /// [`record_attempt`][Self::record_attempt].
    pub fn record_error(&self, op: Operation) {
        self.counters[op.index()].error();
    }

    pub fn attempts(&self, op: Operation) -> u64 {
        self.counters[op.index()].load().0
    }

    pub fn errors(&self, op: Operation) -> u64 {
        self.counters[op.index()].load().1
    }

    /// Current counters, one row per operation in [`Operation::ALL`] order.
    pub fn snapshot(&self) -> Vec<OperationRow> {
        Operation::ALL
            .iter()
            .map(|&operation| {
                let (attempts, errors) = self.counters[operation.index()].load();
                OperationRow { operation, attempts, errors }
            })
            .collect()
    }
}
