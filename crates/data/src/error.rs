use position_watch_domain::SnapshotError;

/// Failure to obtain a snapshot.
///
/// Callers are expected to treat every variant the same way; the variants
/// exist to give the logs a precise cause.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or timeout.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The venue answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The response could not be decoded.
    #[error("Malformed payload: {0}")]
    Malformed(String),
    /// The response violated snapshot invariants.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}
