//! Seeded RNG wrappers.
//!
//! A run is reproducible from its seed alone.  World population draws from
//! one [`SimRng`]; each unit's pacing draws from its own [`UnitRng`], seeded
//! as `seed ^ (unit * GOLDEN)`, so a unit's sequence does not depend on how
//! tasks interleave inside a round.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::UnitId;

/// Fractional part of the golden ratio, as a 64-bit constant.
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

/// Pacing RNG owned by one unit.  Travels into the unit's task each round
/// and back to the driver afterwards.
#[derive(Debug, Clone)]
pub struct UnitRng(SmallRng);

impl UnitRng {
    pub fn new(seed: u64, unit: UnitId) -> Self {
        UnitRng(SmallRng::seed_from_u64(seed ^ (unit.0 as u64).wrapping_mul(GOLDEN)))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

/// Run-wide RNG for population and the shared pacing ceiling.  Callers
/// serialise access themselves.
#[derive(Debug, Clone)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream tagged with `offset`.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>() ^ offset.wrapping_mul(GOLDEN);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
