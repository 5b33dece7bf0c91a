//! Position data sources.
//!
//! This crate fetches the open positions of an account from a remote
//! venue and turns the response into a [`Snapshot`].

/// Error types.
pub mod error;
/// Venue-specific providers.
pub mod providers;

pub use error::FetchError;

use async_trait::async_trait;
use position_watch_domain::Snapshot;

/// A source of open-position snapshots.
///
/// Implementations make a single bounded attempt per call. Retrying is
/// left to the caller's schedule.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Fetches the current open positions of `account`.
    async fn fetch(&self, account: &str) -> Result<Snapshot, FetchError>;
}
