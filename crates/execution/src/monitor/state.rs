//! Monitor state and its transitions.

use super::MonitorEvent;
use crate::error::MonitorError;
use position_watch_data::FetchError;
use position_watch_domain::Snapshot;

/// Lifecycle phase of the monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorPhase {
    /// No fetch attempted yet.
    #[default]
    Uninitialized,
    /// Startup succeeded; polling.
    Monitoring,
    /// The first fetch failed. Terminal.
    StartupFailed,
}

/// Process-lifetime state of the monitor.
///
/// Transitions never mutate a state in place: each one returns a fresh
/// state that the owner swaps in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    phase: MonitorPhase,
    previous: Option<Snapshot>,
    last_fetch_error: Option<String>,
    iterations: u64,
    consecutive_failures: u32,
}

/// Result of applying a fetch outcome to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State to swap in.
    pub state: MonitorState,
    /// Events to report, in emission order.
    pub events: Vec<MonitorEvent>,
}

impl MonitorState {
    /// Creates an uninitialized state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Last known-good snapshot.
    #[must_use]
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Most recent fetch error, kept for logging.
    #[must_use]
    pub fn last_fetch_error(&self) -> Option<&str> {
        self.last_fetch_error.as_deref()
    }

    /// Steady-state iterations attempted so far.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Failed fetches since the last success.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Applies the result of the first fetch.
    ///
    /// # Errors
    /// Returns [`MonitorError::InvalidPhase`] unless the state is
    /// uninitialized.
    pub fn on_startup(
        &self,
        result: &Result<Snapshot, FetchError>,
    ) -> Result<Transition, MonitorError> {
        self.expect_phase(MonitorPhase::Uninitialized, "start")?;

        let transition = match result {
            Ok(snapshot) => Transition {
                state: MonitorState {
                    phase: MonitorPhase::Monitoring,
                    previous: Some(snapshot.clone()),
                    ..self.clone()
                },
                events: vec![MonitorEvent::StartupStatus {
                    snapshot: snapshot.clone(),
                }],
            },
            Err(e) => {
                let cause = e.to_string();
                Transition {
                    state: MonitorState {
                        phase: MonitorPhase::StartupFailed,
                        last_fetch_error: Some(cause.clone()),
                        consecutive_failures: 1,
                        ..self.clone()
                    },
                    events: vec![MonitorEvent::StartupFailed { cause }],
                }
            }
        };

        Ok(transition)
    }

    /// Applies the result of a steady-state fetch.
    ///
    /// A failure leaves the previous snapshot untouched and reports
    /// nothing. A success reports closed positions before opened ones and
    /// replaces the previous snapshot.
    ///
    /// # Errors
    /// Returns [`MonitorError::InvalidPhase`] unless the state is
    /// monitoring.
    pub fn on_poll(
        &self,
        result: &Result<Snapshot, FetchError>,
    ) -> Result<Transition, MonitorError> {
        self.expect_phase(MonitorPhase::Monitoring, "poll")?;

        let iterations = self.iterations + 1;

        let transition = match result {
            Err(e) => Transition {
                state: MonitorState {
                    last_fetch_error: Some(e.to_string()),
                    iterations,
                    consecutive_failures: self.consecutive_failures.saturating_add(1),
                    ..self.clone()
                },
                events: Vec::new(),
            },
            Ok(snapshot) => {
                let diff = self
                    .previous
                    .as_ref()
                    .map(|prev| prev.diff(snapshot))
                    .unwrap_or_else(|| Snapshot::empty().diff(snapshot));

                let mut events = Vec::with_capacity(2);
                if !diff.closed.is_empty() {
                    events.push(MonitorEvent::PositionsClosed {
                        positions: diff.closed,
                    });
                }
                if !diff.opened.is_empty() {
                    events.push(MonitorEvent::PositionsOpened {
                        positions: diff.opened,
                    });
                }

                Transition {
                    state: MonitorState {
                        previous: Some(snapshot.clone()),
                        iterations,
                        consecutive_failures: 0,
                        ..self.clone()
                    },
                    events,
                }
            }
        };

        Ok(transition)
    }

    fn expect_phase(
        &self,
        expected: MonitorPhase,
        operation: &'static str,
    ) -> Result<(), MonitorError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MonitorError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use position_watch_domain::Position;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn snapshot(entries: &[(&str, Decimal)]) -> Snapshot {
        Snapshot::from_positions(entries.iter().map(|(i, s)| Position::new(*i, *s))).unwrap()
    }

    fn failure() -> Result<Snapshot, FetchError> {
        Err(FetchError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        })
    }

    fn monitoring(initial: Snapshot) -> MonitorState {
        MonitorState::new().on_startup(&Ok(initial)).unwrap().state
    }

    #[test]
    fn test_startup_success() {
        let t = MonitorState::new().on_startup(&Ok(Snapshot::empty())).unwrap();

        assert_eq!(t.state.phase(), MonitorPhase::Monitoring);
        assert_eq!(t.state.previous(), Some(&Snapshot::empty()));
        assert_eq!(
            t.events,
            vec![MonitorEvent::StartupStatus {
                snapshot: Snapshot::empty()
            }]
        );
    }

    #[test]
    fn test_startup_failure() {
        let t = MonitorState::new().on_startup(&failure()).unwrap();

        assert_eq!(t.state.phase(), MonitorPhase::StartupFailed);
        assert!(t.state.previous().is_none());
        assert!(t.state.last_fetch_error().unwrap().contains("502"));
        assert_eq!(t.events.len(), 1);
        assert!(matches!(t.events[0], MonitorEvent::StartupFailed { .. }));
    }

    #[test]
    fn test_poll_failure_keeps_previous() {
        let before = monitoring(snapshot(&[("BTC", dec!(2))]));
        let t = before.on_poll(&failure()).unwrap();

        assert!(t.events.is_empty());
        assert_eq!(t.state.previous(), before.previous());
        assert_eq!(t.state.consecutive_failures(), 1);
        assert_eq!(t.state.iterations(), 1);

        let t2 = t.state.on_poll(&failure()).unwrap();
        assert_eq!(t2.state.consecutive_failures(), 2);
        assert_eq!(t2.state.previous(), before.previous());
    }

    #[test]
    fn test_poll_success_resets_failures() {
        let state = monitoring(snapshot(&[("BTC", dec!(2))]));
        let state = state.on_poll(&failure()).unwrap().state;
        let t = state.on_poll(&Ok(snapshot(&[("BTC", dec!(2))]))).unwrap();

        assert!(t.events.is_empty());
        assert_eq!(t.state.consecutive_failures(), 0);
        assert_eq!(t.state.iterations(), 2);
    }

    #[test]
    fn test_poll_emits_closed_before_opened() {
        let state = monitoring(snapshot(&[("BTC", dec!(2)), ("ETH", dec!(-1))]));
        let next = snapshot(&[("ETH", dec!(-1)), ("SOL", dec!(5))]);
        let t = state.on_poll(&Ok(next.clone())).unwrap();

        assert_eq!(
            t.events,
            vec![
                MonitorEvent::PositionsClosed {
                    positions: vec![Position::new("BTC", dec!(2))]
                },
                MonitorEvent::PositionsOpened {
                    positions: vec![Position::new("SOL", dec!(5))]
                },
            ]
        );
        assert_eq!(t.state.previous(), Some(&next));
    }

    #[test]
    fn test_poll_all_closed() {
        let state = monitoring(snapshot(&[("BTC", dec!(2)), ("ETH", dec!(-1))]));
        let t = state.on_poll(&Ok(Snapshot::empty())).unwrap();

        assert_eq!(t.events.len(), 1);
        assert!(matches!(
            &t.events[0],
            MonitorEvent::PositionsClosed { positions } if positions.len() == 2
        ));
    }

    #[test]
    fn test_side_flip_is_invisible() {
        let state = monitoring(snapshot(&[("BTC", dec!(2))]));
        let t = state.on_poll(&Ok(snapshot(&[("BTC", dec!(-2))]))).unwrap();
        assert!(t.events.is_empty());
    }

    #[test]
    fn test_wrong_phase_is_rejected() {
        let fresh = MonitorState::new();
        assert!(matches!(
            fresh.on_poll(&Ok(Snapshot::empty())),
            Err(MonitorError::InvalidPhase {
                phase: MonitorPhase::Uninitialized,
                ..
            })
        ));

        let started = monitoring(Snapshot::empty());
        assert!(matches!(
            started.on_startup(&Ok(Snapshot::empty())),
            Err(MonitorError::InvalidPhase { .. })
        ));

        let failed = MonitorState::new().on_startup(&failure()).unwrap().state;
        assert!(failed.on_poll(&Ok(Snapshot::empty())).is_err());
    }
}
