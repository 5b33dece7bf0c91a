use super::{Alert, Notifier, NotifyError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Fans an alert out to several notifiers.
#[derive(Clone, Default)]
pub struct MultiNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl MultiNotifier {
    /// Creates an empty multi-notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notifier.
    #[must_use]
    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Number of wrapped notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Whether no notifier is wrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    /// Sends to every notifier; the first error is returned once all were tried.
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut first_error = None;

        for notifier in &self.notifiers {
            if let Err(e) = notifier.send(alert).await {
                warn!(id = %alert.id, error = %e, "Notifier failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Counting {
        async fn send(&self, _alert: &Alert) -> Result<(), NotifyError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotifyError::Rejected {
                    status: 400,
                    body: "chat not found".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_multi_notifier_tries_all() {
        let failing = Arc::new(Counting {
            sent: AtomicUsize::new(0),
            fail: true,
        });
        let working = Arc::new(Counting {
            sent: AtomicUsize::new(0),
            fail: false,
        });

        let multi = MultiNotifier::new()
            .with(failing.clone())
            .with(working.clone());
        assert_eq!(multi.len(), 2);

        let result = multi
            .send(&Alert::new(AlertKind::PositionsOpened, "x"))
            .await;

        assert!(matches!(result, Err(NotifyError::Rejected { status: 400, .. })));
        assert_eq!(failing.sent.load(Ordering::SeqCst), 1);
        assert_eq!(working.sent.load(Ordering::SeqCst), 1);
    }
}
