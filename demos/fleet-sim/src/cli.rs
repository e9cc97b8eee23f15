//! Command-line arguments and their mapping onto `FleetConfig`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use fleet_core::{FleetConfig, PacingMode};

/// Which tracking client to run against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// JSON over HTTP to `--address`.
    Http,
    /// In-process recorder; no network needed.
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "fleet-sim")]
#[command(about = "Dispatch delivery units across a grid until every one reaches a warehouse")]
#[command(version)]
pub struct Cli {
    /// TOML file with a `FleetConfig`; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tracking service address
    #[arg(short, long)]
    pub address: Option<String>,

    #[arg(long, value_enum, default_value = "http")]
    pub transport: Transport,

    /// Deadline for the initial connection (e.g. "30s")
    #[arg(long)]
    pub connect_timeout: Option<humantime::Duration>,

    /// Simulated latency of each report call with `--transport memory`
    #[arg(long, default_value = "0s")]
    pub latency: humantime::Duration,

    /// Warehouse count (random in [10, 255] when unset)
    #[arg(long)]
    pub warehouses: Option<u32>,

    /// Delivery unit count (random in [10, 1024] when unset)
    #[arg(long)]
    pub units: Option<u32>,

    #[arg(long)]
    pub grid_width: Option<u32>,

    #[arg(long)]
    pub grid_height: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Starting pacing ceiling, in pacing units
    #[arg(long)]
    pub pacing_ceiling: Option<u32>,

    /// Pacing mode (per-unit, shared)
    #[arg(long)]
    pub pacing_mode: Option<PacingMode>,

    /// Stop after this many rounds
    #[arg(long)]
    pub max_rounds: Option<u64>,

    /// Strand a unit after this many consecutive failures
    #[arg(long)]
    pub max_unit_failures: Option<u32>,

    /// Directory for `round_summaries.csv` and `operation_stats.csv`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<FleetConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

impl Cli {
    /// The config file (or defaults) with every given flag applied.
    pub fn fleet_config(&self) -> Result<FleetConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FleetConfig::default(),
        };

        if let Some(address) = &self.address {
            config.api_address = address.clone();
        }
        if let Some(timeout) = &self.connect_timeout {
            config.connect_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if self.warehouses.is_some() {
            config.warehouses = self.warehouses;
        }
        if self.units.is_some() {
            config.units = self.units;
        }
        if let Some(w) = self.grid_width {
            config.grid_width = w;
        }
        if let Some(h) = self.grid_height {
            config.grid_height = h;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ceiling) = self.pacing_ceiling {
            config.pacing_ceiling = ceiling;
        }
        if let Some(mode) = self.pacing_mode {
            config.pacing_mode = mode;
        }
        if self.max_rounds.is_some() {
            config.max_rounds = self.max_rounds;
        }
        if self.max_unit_failures.is_some() {
            config.max_unit_failures = self.max_unit_failures;
        }

        config.validate()?;
        Ok(config)
    }
}
