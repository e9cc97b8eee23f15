//! Adaptive pacing: how long a delivery task waits before it routes.
//!
//! The wait starts at a configured ceiling and shrinks quickly:
//!
//! ```text
//! next = uniform(1 ..= max(previous, 1)) / 2
//! ```
//!
//! so after a handful of rounds every unit paces at zero.  Two modes are
//! available (see [`PacingMode`]):
//!
//! | Mode       | State                                     | Reproducible |
//! |------------|-------------------------------------------|--------------|
//! | `PerUnit`  | one [`Pacer`] per unit, own `UnitRng`     | yes          |
//! | `Shared`   | one [`SharedPacing`] behind a mutex       | no           |
//!
//! In shared mode the ceiling is read and rewritten inside one critical
//! section, so no two tasks ever observe the same value and then both
//! write a successor.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;

use fleet_core::{FleetConfig, PacingMode, SimRng, UnitId, UnitRng};

/// Seed offset of the shared pacing RNG, so it never replays the world
/// population draws.
const SHARED_PACING_STREAM: u64 = 0x7061_6365;

/// The ceiling that follows `previous`.
#[inline]
pub fn next_ceiling<R: Rng>(previous: u32, rng: &mut R) -> u32 {
    rng.gen_range(1..=previous.max(1)) >> 1
}

// ── Pacer ─────────────────────────────────────────────────────────────────────

/// Pacing state owned by a single unit.
#[derive(Debug, Clone)]
pub struct Pacer {
    ceiling: u32,
    rng:     UnitRng,
}

impl Pacer {
    pub fn new(ceiling: u32, rng: UnitRng) -> Self {
        Self { ceiling, rng }
    }

    #[inline]
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Return the current ceiling and decay it.
    pub fn advance(&mut self) -> u32 {
        let current = self.ceiling;
        self.ceiling = next_ceiling(current, self.rng.inner());
        current
    }
}

// ── SharedPacing ──────────────────────────────────────────────────────────────

#[derive(Debug)]
struct SharedState {
    ceiling: u32,
    rng:     SimRng,
}

/// One run-wide ceiling shared by every task.
#[derive(Debug)]
pub struct SharedPacing {
    state: Mutex<SharedState>,
}

impl SharedPacing {
    pub fn new(ceiling: u32, rng: SimRng) -> Self {
        Self { state: Mutex::new(SharedState { ceiling, rng }) }
    }

    pub fn ceiling(&self) -> u32 {
        self.state.lock().ceiling
    }

    /// Return the current ceiling and decay it, atomically.
    pub fn advance(&self) -> u32 {
        let mut state = self.state.lock();
        let current = state.ceiling;
        state.ceiling = next_ceiling(current, state.rng.inner());
        current
    }
}

// ── PacingController ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Source {
    PerUnit(Pacer),
    Shared(Arc<SharedPacing>),
}

/// The pacing handle a delivery task carries.
///
/// The driver owns one controller per unit, moves it into that unit's task
/// for the round, and takes it back when the task finishes.
#[derive(Debug, Clone)]
pub struct PacingController {
    unit:   Duration,
    source: Source,
}

impl PacingController {
    /// A controller with its own per-unit state.
    pub fn per_unit(ceiling: u32, rng: UnitRng, unit: Duration) -> Self {
        Self { unit, source: Source::PerUnit(Pacer::new(ceiling, rng)) }
    }

    /// A controller backed by the run-wide ceiling.
    pub fn shared(shared: Arc<SharedPacing>, unit: Duration) -> Self {
        Self { unit, source: Source::Shared(shared) }
    }

    /// How long to wait this time.  Decays the ceiling for the next call.
    pub fn next_wait(&mut self) -> Duration {
        let ceiling = match &mut self.source {
            Source::PerUnit(pacer) => pacer.advance(),
            Source::Shared(shared) => shared.advance(),
        };
        self.unit * ceiling
    }

    /// The ceiling the next [`next_wait`][Self::next_wait] will use.
    pub fn ceiling(&self) -> u32 {
        match &self.source {
            Source::PerUnit(pacer) => pacer.ceiling(),
            Source::Shared(shared) => shared.ceiling(),
        }
    }
}

/// Build one controller per unit according to `config.pacing_mode`.
pub fn controllers_for(
    config: &FleetConfig,
    units:  impl IntoIterator<Item = UnitId>,
) -> Vec<(UnitId, PacingController)> {
    let unit = config.pacing_unit();
    match config.pacing_mode {
        PacingMode::PerUnit => units
            .into_iter()
            .map(|id| {
                let rng = UnitRng::new(config.seed, id);
                (id, PacingController::per_unit(config.pacing_ceiling, rng, unit))
            })
            .collect(),
        PacingMode::Shared => {
            let rng = SimRng::new(config.seed).child(SHARED_PACING_STREAM);
            let shared = Arc::new(SharedPacing::new(config.pacing_ceiling, rng));
            units
                .into_iter()
                .map(|id| (id, PacingController::shared(Arc::clone(&shared), unit)))
                .collect()
        }
    }
}
