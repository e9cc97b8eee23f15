//! Delivery unit lifecycle status.

/// Where a unit is in its journey.
///
/// Transitions are one-way: `Pending → Arrived` or `Pending → Stranded`.
/// The world model rejects any transition out of a terminal status.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitStatus {
    /// Still moving, or arrived but the arrival has not been acknowledged.
    #[default]
    Pending,
    /// Arrival reported successfully.
    Arrived,
    /// Gave up after exhausting the per-unit failure budget.
    Stranded,
}

impl UnitStatus {
    /// `true` for `Arrived` and `Stranded`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, UnitStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Pending  => "pending",
            UnitStatus::Arrived  => "arrived",
            UnitStatus::Stranded => "stranded",
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
