//! Position monitoring and alert delivery.
//!
//! This crate provides the live side of the watcher:
//! - Snapshot diffing with an explicit, swappable monitor state
//! - A polling loop with cooperative shutdown
//! - Alert rendering and delivery (Telegram, console, fan-out)

/// Prelude module for convenient imports.
pub mod prelude;

/// Alert rendering and delivery.
pub mod alerts;
/// Error types.
pub mod error;
/// Position diff monitor.
pub mod monitor;
