use super::{Alert, Notifier, NotifyError};
use async_trait::async_trait;
use tracing::info;

/// Writes alerts to the log instead of an external channel.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Creates a new console notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        info!(id = %alert.id, kind = ?alert.kind, "Alert\n{}", alert.text);
        Ok(())
    }
}
