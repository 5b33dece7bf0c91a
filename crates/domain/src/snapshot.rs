//! Snapshot of all open positions for one account.

use crate::diff::SnapshotDiff;
use crate::error::SnapshotError;
use crate::position::Position;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// All open positions observed by a single fetch, keyed by instrument.
///
/// A snapshot never contains a zero-size position and never holds two
/// entries for the same instrument. It is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    positions: BTreeMap<String, Position>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from reported positions.
    ///
    /// Zero-size positions are discarded.
    ///
    /// # Errors
    /// Returns an error if the same instrument appears twice with a
    /// non-zero size.
    pub fn from_positions<I>(positions: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut map = BTreeMap::new();

        for position in positions.into_iter().filter(Position::is_open) {
            match map.entry(position.instrument.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(slot) => {
                    return Err(SnapshotError::DuplicateInstrument(slot.key().clone()));
                }
            }
        }

        Ok(Self { positions: map })
    }

    /// Gets a position by instrument.
    #[must_use]
    pub fn get(&self, instrument: &str) -> Option<&Position> {
        self.positions.get(instrument)
    }

    /// Whether the instrument has an open position.
    #[must_use]
    pub fn contains(&self, instrument: &str) -> bool {
        self.positions.contains_key(instrument)
    }

    /// Instruments with an open position, in ascending order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    /// Positions in ascending instrument order.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Number of open positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no open positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Compares this snapshot against a newer one.
    ///
    /// Only instruments entering or leaving the set are reported. An
    /// instrument present in both snapshots is unchanged even if its size,
    /// side or prices differ.
    #[must_use]
    pub fn diff(&self, next: &Snapshot) -> SnapshotDiff {
        let closed = self
            .iter()
            .filter(|p| !next.contains(&p.instrument))
            .cloned()
            .collect();

        let opened = next
            .iter()
            .filter(|p| !self.contains(&p.instrument))
            .cloned()
            .collect();

        SnapshotDiff { closed, opened }
    }
}
