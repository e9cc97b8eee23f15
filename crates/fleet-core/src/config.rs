//! Run configuration.
//!
//! `FleetConfig` is typically loaded from a TOML file by the application
//! crate (with the `serde` feature) and then patched with command-line
//! overrides before being passed to the dispatch engine.

use std::time::Duration;

use crate::{FleetError, FleetResult, SimRng};

/// Lower bound for randomly drawn warehouse and unit counts.
pub const MIN_RANDOM_COUNT: u32 = 10;
/// Upper bound for a randomly drawn warehouse count.
pub const MAX_WAREHOUSES: u32 = (1 << 8) - 1;
/// Upper bound for a randomly drawn unit count.
pub const MAX_UNITS: u32 = 1 << 10;

// ── PacingMode ────────────────────────────────────────────────────────────────

/// How the pacing ceiling is shared between dispatch tasks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PacingMode {
    /// Every unit decays its own ceiling with its own RNG.  Reproducible
    /// for a given seed regardless of task interleaving.
    #[default]
    PerUnit,
    /// One run-wide ceiling, read and rewritten under a lock by whichever
    /// task paces next.
    Shared,
}

impl PacingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PacingMode::PerUnit => "per-unit",
            PacingMode::Shared  => "shared",
        }
    }
}

impl std::str::FromStr for PacingMode {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "per-unit" | "perunit" | "unit" => Ok(PacingMode::PerUnit),
            "shared" => Ok(PacingMode::Shared),
            other => Err(FleetError::Config(format!("unknown pacing mode: {other}"))),
        }
    }
}

impl std::fmt::Display for PacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    /// Base address of the tracking service.
    pub api_address: String,

    /// Deadline for the one-off connection attempt at startup, in
    /// milliseconds.
    pub connect_timeout_ms: u64,

    /// Warehouse count.  `None` draws one in `[10, 255]`.
    pub warehouses: Option<u32>,

    /// Delivery unit count.  `None` draws one in `[10, 1024]`.
    pub units: Option<u32>,

    /// Grid width in cells.
    pub grid_width: u32,

    /// Grid height in cells.
    pub grid_height: u32,

    /// Master RNG seed.  The same seed always produces the same world and,
    /// in `PerUnit` pacing mode, the same pacing sequences.
    pub seed: u64,

    /// Starting pacing ceiling, in pacing units.
    pub pacing_ceiling: u32,

    /// Length of one pacing unit in microseconds.
    pub pacing_unit_micros: u64,

    pub pacing_mode: PacingMode,

    /// Stop after this many rounds and report partial completion.
    /// `None` runs until no unit is pending.
    pub max_rounds: Option<u64>,

    /// Strand a unit after this many consecutive failed attempts.
    /// `None` retries forever.
    pub max_unit_failures: Option<u32>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            api_address:          "http://127.0.0.1:50051".to_owned(),
            connect_timeout_ms:   30_000,
            warehouses:           None,
            units:                None,
            grid_width:           256,
            grid_height:          256,
            seed:                 42,
            pacing_ceiling:       100,
            pacing_unit_micros:   1,
            pacing_mode:          PacingMode::PerUnit,
            max_rounds:           None,
            max_unit_failures:    None,
        }
    }
}

impl FleetConfig {
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[inline]
    pub fn pacing_unit(&self) -> Duration {
        Duration::from_micros(self.pacing_unit_micros)
    }

    /// Total number of cells on the grid.
    #[inline]
    pub fn grid_cells(&self) -> u64 {
        self.grid_width as u64 * self.grid_height as u64
    }

    /// Resolve `(warehouses, units)`, drawing any unset count from `rng`.
    pub fn resolve_counts(&self, rng: &mut SimRng) -> (u32, u32) {
        let warehouses = self
            .warehouses
            .unwrap_or_else(|| rng.gen_range(MIN_RANDOM_COUNT..=MAX_WAREHOUSES));
        let units = self
            .units
            .unwrap_or_else(|| rng.gen_range(MIN_RANDOM_COUNT..=MAX_UNITS));
        (warehouses, units)
    }

    /// Reject configurations the world model or driver cannot honour.
    pub fn validate(&self) -> FleetResult<()> {
        if self.api_address.trim().is_empty() {
            return Err(FleetError::Config("api_address must not be empty".into()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(FleetError::Config("connect_timeout_ms must be at least 1".into()));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(FleetError::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.warehouses == Some(0) {
            return Err(FleetError::Config("at least one warehouse is required".into()));
        }
        // Warehouses occupy distinct cells.
        let max_warehouses = self.warehouses.unwrap_or(MAX_WAREHOUSES) as u64;
        if max_warehouses > self.grid_cells() {
            return Err(FleetError::Config(format!(
                "{max_warehouses} warehouses do not fit on a {}x{} grid",
                self.grid_width, self.grid_height
            )));
        }
        if self.max_rounds == Some(0) {
            return Err(FleetError::Config("max_rounds must be at least 1".into()));
        }
        if self.max_unit_failures == Some(0) {
            return Err(FleetError::Config("max_unit_failures must be at least 1".into()));
        }
        Ok(())
    }
}
