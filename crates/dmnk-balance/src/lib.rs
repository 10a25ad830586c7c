//! Periodic balance refresh for the unlocked DMNK account
//!
//! A [`BalancePoller`] calls an injected [`BalanceSource`] on a fixed
//! interval, one fetch at a time, and publishes each successful read through
//! a [`PollerHandle`]. Failed fetches keep the previous value.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod error;
pub mod poller;
pub mod source;

pub use cancel::StopGate;
pub use error::{Error, FetchError, Result};
pub use poller::{BalancePoller, BalanceSnapshot, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use source::BalanceSource;
