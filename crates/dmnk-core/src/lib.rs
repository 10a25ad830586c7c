//! DMNK game core
//!
//! Account key material, address derivation, the wager range calculator and
//! the shared configuration model used by the keystore and the balance poller.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod config;
pub mod error;
pub mod kdf;
pub mod wager;

pub use account::{shorten_address, Account, Address, SecretHandle};
pub use config::{BalanceSettings, DmnkConfig, KeystoreSettings, StorageSettings};
pub use error::{Error, ErrorCategory, Result};
pub use kdf::{KdfParams, MAX_ITERATIONS, MAX_MEMORY_COST, MAX_PARALLELISM};
pub use wager::{WagerLimits, WagerSettings};
