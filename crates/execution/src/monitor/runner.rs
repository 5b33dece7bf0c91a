//! Polling loop driving the monitor state.

use super::{MonitorEvent, MonitorPhase, MonitorState};
use crate::alerts::{Notifier, format};
use crate::error::MonitorError;
use position_watch_data::PositionSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Default polling interval (15 minutes).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;

/// Configuration for the position monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Account to watch.
    pub account: String,
    /// Pause between two checks.
    pub poll_interval: Duration,
}

impl MonitorConfig {
    /// Creates a configuration with the default interval.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Sets the polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Outcome of one steady-state iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    /// Iteration number, starting at 1.
    pub iteration: u64,
    /// Whether the fetch succeeded.
    pub fetch_ok: bool,
    /// Instruments reported as closed.
    pub closed: Vec<String>,
    /// Instruments reported as opened.
    pub opened: Vec<String>,
    /// Open positions held after the iteration.
    pub open_positions: usize,
}

/// Reason the monitor loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// A shutdown was requested or its sender went away.
    Shutdown,
}

/// Watches one account and alerts on opened and closed positions.
pub struct PositionMonitor {
    /// Snapshot source.
    source: Arc<dyn PositionSource>,
    /// Alert channel.
    notifier: Arc<dyn Notifier>,
    /// Configuration.
    config: MonitorConfig,
    /// Current state.
    state: MonitorState,
}

impl PositionMonitor {
    /// Creates a new monitor in the uninitialized phase.
    pub fn new(
        source: Arc<dyn PositionSource>,
        notifier: Arc<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            config,
            state: MonitorState::new(),
        }
    }

    /// Gets the current state.
    #[must_use]
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Takes the initial snapshot and reports it.
    ///
    /// # Errors
    /// Returns [`MonitorError::StartupFetch`] after the failure alert has
    /// been dispatched if the first fetch fails.
    pub async fn start(&mut self) -> Result<(), MonitorError> {
        info!(account = %self.config.account, "Fetching initial positions");

        let result = self.source.fetch(&self.config.account).await;
        let transition = self.state.on_startup(&result)?;
        self.state = transition.state;
        self.dispatch(&transition.events).await;

        match result {
            Ok(snapshot) => {
                info!(positions = snapshot.len(), "Monitoring started");
                for position in snapshot.iter() {
                    info!(
                        instrument = %position.instrument,
                        side = position.side().map_or("FLAT", |s| s.as_str()),
                        size = %position.size,
                        "Open position"
                    );
                }
                Ok(())
            }
            Err(e) => {
                error!(account = %self.config.account, error = %e, "Initial fetch failed");
                Err(MonitorError::StartupFetch(e))
            }
        }
    }

    /// Runs one steady-state iteration: fetch, diff, alert.
    ///
    /// # Errors
    /// Returns [`MonitorError::InvalidPhase`] if the monitor has not
    /// started successfully.
    pub async fn poll_once(&mut self) -> Result<IterationReport, MonitorError> {
        if self.state.phase() != MonitorPhase::Monitoring {
            return Err(MonitorError::InvalidPhase {
                operation: "poll",
                phase: self.state.phase(),
            });
        }

        let iteration = self.state.iterations() + 1;
        info!(iteration, "Checking positions");

        let result = self.source.fetch(&self.config.account).await;
        let transition = self.state.on_poll(&result)?;
        self.state = transition.state;

        let fetch_ok = result.is_ok();
        if let Err(e) = &result {
            warn!(
                iteration,
                error = %e,
                consecutive_failures = self.state.consecutive_failures(),
                "Fetch failed, skipping iteration"
            );
        }

        let mut report = IterationReport {
            iteration,
            fetch_ok,
            closed: Vec::new(),
            opened: Vec::new(),
            open_positions: self.state.previous().map_or(0, |s| s.len()),
        };

        for event in &transition.events {
            match event {
                MonitorEvent::PositionsClosed { positions } => {
                    report.closed = positions.iter().map(|p| p.instrument.clone()).collect();
                    info!(instruments = ?report.closed, "Positions closed");
                }
                MonitorEvent::PositionsOpened { positions } => {
                    report.opened = positions.iter().map(|p| p.instrument.clone()).collect();
                    info!(instruments = ?report.opened, "Positions opened");
                }
                _ => {}
            }
        }

        self.dispatch(&transition.events).await;

        if fetch_ok {
            info!(iteration, open_positions = report.open_positions, "Check complete");
        }

        Ok(report)
    }

    /// Starts the monitor and polls until shutdown.
    ///
    /// The loop exits when `shutdown` holds `true` or its sender is
    /// dropped. Iterations never overlap: the next wait starts only after
    /// the current alerts were dispatched.
    ///
    /// # Errors
    /// Returns [`MonitorError::StartupFetch`] if the first fetch fails; no
    /// polling happens in that case.
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<MonitorExit, MonitorError> {
        self.start().await?;

        let interval = self.config.poll_interval;

        loop {
            if *shutdown.borrow() {
                break;
            }

            info!(
                wait = %format::describe_interval(interval),
                "Waiting for next check"
            );

            let sleep = tokio::time::sleep(interval);
            tokio::pin!(sleep);

            // A `false` update keeps the current deadline.
            let stop = loop {
                tokio::select! {
                    () = &mut sleep => break false,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break true;
                        }
                    }
                }
            };
            if stop {
                break;
            }

            self.poll_once().await?;
        }

        info!(iterations = self.state.iterations(), "Monitor stopped");
        Ok(MonitorExit::Shutdown)
    }

    /// Renders and sends events; delivery failures are logged and dropped.
    async fn dispatch(&self, events: &[MonitorEvent]) {
        for event in events {
            let alert = event.to_alert(&self.config.account, self.config.poll_interval);
            debug!(id = %alert.id, kind = ?alert.kind, "Dispatching alert");

            if let Err(e) = self.notifier.send(&alert).await {
                warn!(id = %alert.id, kind = ?alert.kind, error = %e, "Alert delivery failed");
            }
        }
    }
}
