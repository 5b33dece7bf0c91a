/// Errors raised while building a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The same instrument was reported twice as an open position.
    #[error("Duplicate instrument in snapshot: {0}")]
    DuplicateInstrument(String),
}
