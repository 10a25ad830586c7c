//! Error types for DMNK Core

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// DMNK Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bid or slippage outside the accepted domain
    #[error("Invalid wager: {0}")]
    InvalidWager(String),

    /// Malformed account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Secret key bytes rejected by the curve
    #[error("Invalid key material: {0}")]
    KeyMaterial(String),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::InvalidWager(_) | Error::InvalidAddress(_))
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidWager(_) => {
                "The bid must be positive and the slippage between 0% and 100%.".to_string()
            }
            Error::InvalidAddress(_) => {
                "The address is invalid. Please check and try again.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidWager(_) => ErrorCategory::Wager,
            Error::InvalidAddress(_) | Error::KeyMaterial(_) => ErrorCategory::Keys,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wager input errors
    Wager,
    /// Key and address errors
    Keys,
    /// Configuration errors
    Config,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Wager => write!(f, "Wager"),
            ErrorCategory::Keys => write!(f, "Keys"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}
