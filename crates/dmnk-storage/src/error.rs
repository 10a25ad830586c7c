//! Error types

use std::fmt;

/// Storage and keystore errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record is already present; route to unlock instead
    #[error("Account already exists")]
    AlreadyExists,

    /// Wrong passphrase, or the stored record is corrupted or tampered with
    #[error("Unlock failed: wrong passphrase or unreadable record")]
    UnlockFailed,

    /// Durable store read or write failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Core error
    #[error(transparent)]
    Core(#[from] dmnk_core::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}

impl Error {
    /// Recoverable by re-prompting or re-routing the user
    pub fn is_user_error(&self) -> bool {
        match self {
            Error::AlreadyExists | Error::UnlockFailed => true,
            Error::Core(e) => e.is_user_error(),
            _ => false,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::AlreadyExists => {
                "An account already exists on this device. Unlock it instead.".to_string()
            }
            Error::UnlockFailed => "Wrong password. Please try again.".to_string(),
            Error::StoreUnavailable(_) => {
                "Local storage is unavailable. Your account was not changed.".to_string()
            }
            Error::Core(e) => e.user_message(),
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::AlreadyExists => ErrorCategory::Account,
            Error::UnlockFailed => ErrorCategory::Unlock,
            Error::StoreUnavailable(_) => ErrorCategory::Storage,
            Error::Encryption(_) => ErrorCategory::Crypto,
            Error::Core(_) => ErrorCategory::Core,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Account lifecycle errors
    Account,
    /// Unlock errors
    Unlock,
    /// Durable store errors
    Storage,
    /// Cryptographic errors
    Crypto,
    /// Errors raised by dmnk-core
    Core,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Account => write!(f, "Account"),
            ErrorCategory::Unlock => write!(f, "Unlock"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Crypto => write!(f, "Crypto"),
            ErrorCategory::Core => write!(f, "Core"),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
