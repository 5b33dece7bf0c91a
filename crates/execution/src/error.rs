use crate::monitor::MonitorPhase;
use position_watch_data::FetchError;

/// Errors surfaced by the position monitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The very first fetch failed; the monitor did not start.
    #[error("Startup fetch failed: {0}")]
    StartupFetch(#[source] FetchError),
    /// A transition was requested in a phase that does not allow it.
    #[error("Cannot {operation} while {phase:?}")]
    InvalidPhase {
        /// Requested operation.
        operation: &'static str,
        /// Phase the monitor was in.
        phase: MonitorPhase,
    },
}
