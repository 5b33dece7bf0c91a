//! Differences between two consecutive snapshots.

use crate::position::Position;

/// Transitions between a previous and a newer snapshot.
///
/// Both lists are ordered by instrument and never share an instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Positions that left the set, as last seen in the previous snapshot.
    pub closed: Vec<Position>,
    /// Positions that entered the set, as seen in the newer snapshot.
    pub opened: Vec<Position>,
}

impl SnapshotDiff {
    /// Whether no instrument entered or left the set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.opened.is_empty()
    }

    /// Instruments that closed.
    #[must_use]
    pub fn closed_instruments(&self) -> Vec<&str> {
        self.closed.iter().map(|p| p.instrument.as_str()).collect()
    }

    /// Instruments that opened.
    #[must_use]
    pub fn opened_instruments(&self) -> Vec<&str> {
        self.opened.iter().map(|p| p.instrument.as_str()).collect()
    }
}
