//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use position_watch_execution::prelude::*;
//! ```

// Alerts
pub use crate::alerts::{
    Alert, AlertKind, ConsoleNotifier, MultiNotifier, Notifier, NotifyError, TelegramConfig,
    TelegramNotifier,
};

// Errors
pub use crate::error::MonitorError;

// Monitor
pub use crate::monitor::{
    DEFAULT_POLL_INTERVAL_SECS, IterationReport, MonitorConfig, MonitorEvent, MonitorExit,
    MonitorPhase, MonitorState, PositionMonitor, Transition,
};
