//! Position diff monitor.
//!
//! The monitor keeps the last successfully fetched snapshot and, on every
//! tick, compares it with a fresh one:
//! - Instruments that disappeared are reported as closed
//! - Instruments that appeared are reported as opened
//! - Failed fetches are logged and skipped without touching the state
//!
//! Positions are keyed by instrument only. A position that flips from long
//! to short between two checks without ever reaching zero stays in both
//! snapshots and produces no alert; size and PnL changes are not tracked.

mod events;
mod runner;
mod state;

pub use events::*;
pub use runner::*;
pub use state::*;
