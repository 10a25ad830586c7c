//! Error types

/// Poller setup errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Poll interval must be non-zero
    #[error("Invalid poll interval: {0}")]
    InvalidInterval(String),

    /// `start` was called outside a Tokio runtime
    #[error("No Tokio runtime available to run the poller")]
    NoRuntime,
}

/// Failure reported by a balance source
///
/// Never surfaced by the poller; the last good value is kept instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The ledger or node could not be reached
    #[error("Balance source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with something that is not a balance
    #[error("Invalid balance value: {0}")]
    InvalidValue(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
