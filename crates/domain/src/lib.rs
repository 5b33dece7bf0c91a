//! Domain model for the position watcher.
//!
//! This crate holds the pure types shared by the fetcher, the monitor and
//! the CLI:
//! - Open positions and their side
//! - Snapshots of all open positions for one account
//! - Differences between two consecutive snapshots

/// Snapshot differences.
pub mod diff;
/// Error types.
pub mod error;
/// Position side enumeration.
pub mod enums;
/// Open position entity.
pub mod position;
/// Snapshot of open positions.
pub mod snapshot;

pub use diff::SnapshotDiff;
pub use enums::Side;
pub use error::SnapshotError;
pub use position::Position;
pub use snapshot::Snapshot;
