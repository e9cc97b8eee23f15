//! Grid coordinate type and stepping helpers.
//!
//! The world is a bounded integer grid.  Units move one cell per step in
//! any of the eight directions, so the number of steps between two cells is
//! their Chebyshev distance.

/// A cell on the simulation grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Number of single-cell moves needed to reach `other`.
    #[inline]
    pub fn steps_to(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Squared Euclidean distance, used for nearest-warehouse queries.
    #[inline]
    pub fn distance_sq(self, other: Coordinate) -> u64 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        dx * dx + dy * dy
    }

    /// The cell one step closer to `target`.  Returns `self` when already
    /// there.
    pub fn step_toward(self, target: Coordinate) -> Coordinate {
        Coordinate {
            x: step_axis(self.x, target.x),
            y: step_axis(self.y, target.y),
        }
    }

    /// `true` if the cell lies inside a `width × height` grid.
    #[inline]
    pub fn within(self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }
}

#[inline]
fn step_axis(from: u32, to: u32) -> u32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less    => from + 1,
        std::cmp::Ordering::Greater => from - 1,
        std::cmp::Ordering::Equal   => from,
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X:{}, Y:{}", self.x, self.y)
    }
}
