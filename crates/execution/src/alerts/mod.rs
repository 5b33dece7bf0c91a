//! Alert delivery.
//!
//! Alerts are rendered to Telegram-flavoured HTML by [`format`] and handed
//! to a [`Notifier`]. Delivery is best-effort: the monitor logs a failed
//! send and moves on.

mod console;
pub mod format;
mod multi;
mod telegram;

pub use console::ConsoleNotifier;
pub use multi::MultiNotifier;
pub use telegram::{DEFAULT_TELEGRAM_API_URL, TelegramConfig, TelegramNotifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Kind of alert emitted by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// The first fetch failed; the monitor will not start.
    StartupFailed,
    /// The monitor started and reports the current positions.
    StartupStatus,
    /// One or more positions closed.
    PositionsClosed,
    /// One or more positions opened.
    PositionsOpened,
}

/// A rendered alert ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Alert ID.
    pub id: String,
    /// Alert kind.
    pub kind: AlertKind,
    /// Message body (Telegram HTML).
    pub text: String,
    /// Creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Alert {
    /// Creates a new alert.
    pub fn new(kind: AlertKind, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            text: text.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Failure to deliver an alert.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Transport failure or timeout.
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The delivery endpoint refused the message.
    #[error("Notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// Delivers alerts to a channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one alert.
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}
