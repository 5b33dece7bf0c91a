//! Events produced by monitor transitions.

use crate::alerts::{Alert, AlertKind, format};
use position_watch_domain::{Position, Snapshot};
use std::time::Duration;

/// Something the monitor has to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The first fetch failed.
    StartupFailed {
        /// Failure cause.
        cause: String,
    },
    /// The monitor started with this snapshot.
    StartupStatus {
        /// Initial snapshot.
        snapshot: Snapshot,
    },
    /// Positions present before and missing now.
    PositionsClosed {
        /// Closed positions as last seen.
        positions: Vec<Position>,
    },
    /// Positions missing before and present now.
    PositionsOpened {
        /// Newly opened positions.
        positions: Vec<Position>,
    },
}

impl MonitorEvent {
    /// Alert kind for this event.
    #[must_use]
    pub fn kind(&self) -> AlertKind {
        match self {
            Self::StartupFailed { .. } => AlertKind::StartupFailed,
            Self::StartupStatus { .. } => AlertKind::StartupStatus,
            Self::PositionsClosed { .. } => AlertKind::PositionsClosed,
            Self::PositionsOpened { .. } => AlertKind::PositionsOpened,
        }
    }

    /// Renders the event into an alert.
    #[must_use]
    pub fn to_alert(&self, account: &str, poll_interval: Duration) -> Alert {
        let text = match self {
            Self::StartupFailed { cause } => format::startup_failure(account, cause),
            Self::StartupStatus { snapshot } => {
                format::startup_status(account, snapshot, poll_interval)
            }
            Self::PositionsClosed { positions } => format::positions_closed(account, positions),
            Self::PositionsOpened { positions } => format::positions_opened(account, positions),
        };

        Alert::new(self.kind(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ACCOUNT: &str = "0xb317d2bc2d3d2df5fa441b5bae0ab9d8b07283ae";

    #[test]
    fn test_to_alert_kinds_and_headers() {
        let interval = Duration::from_secs(900);
        let positions = vec![Position::new("BTC", dec!(1))];

        let closed = MonitorEvent::PositionsClosed {
            positions: positions.clone(),
        }
        .to_alert(ACCOUNT, interval);
        assert_eq!(closed.kind, AlertKind::PositionsClosed);
        assert!(closed.text.contains("POSITION CLOSED"));

        let opened = MonitorEvent::PositionsOpened { positions }.to_alert(ACCOUNT, interval);
        assert_eq!(opened.kind, AlertKind::PositionsOpened);
        assert!(opened.text.contains("NEW POSITION"));

        let failed = MonitorEvent::StartupFailed {
            cause: "timeout".to_string(),
        }
        .to_alert(ACCOUNT, interval);
        assert_eq!(failed.kind, AlertKind::StartupFailed);
        assert!(failed.text.contains("timeout"));
    }
}
