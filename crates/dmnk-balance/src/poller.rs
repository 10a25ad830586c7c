//! Balance poller
//!
//! One background task per poller. Each tick performs a single fetch and
//! waits for it before the next tick is considered, so fetches never overlap
//! and a slow source simply stretches the period. Successful reads are
//! published in fetch order; a later read always replaces an earlier one.

use crate::cancel::StopGate;
use crate::source::BalanceSource;
use crate::{Error, FetchError, Result};
use chrono::{DateTime, Utc};
use dmnk_core::{Account, Address, BalanceSettings};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default refresh interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One successful balance read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSnapshot {
    /// Balance as reported by the source
    pub value: f64,
    /// 1 for the first published read, incremented per publish
    pub sequence: u64,
    /// Wall-clock time the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Poller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePoller {
    interval: Duration,
}

impl Default for BalancePoller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl BalancePoller {
    /// Poller with the given refresh interval
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidInterval(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self { interval })
    }

    /// Poller configured from [`BalanceSettings`]
    pub fn from_settings(settings: &BalanceSettings) -> Result<Self> {
        Self::new(settings.poll_interval())
    }

    /// Refresh interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling the balance of `account`
    pub fn start<S>(&self, account: &Account, source: S) -> Result<PollerHandle>
    where
        S: BalanceSource + 'static,
    {
        self.start_for_address(account.address(), source)
    }

    /// Start polling the balance of `address`
    ///
    /// Must be called from within a Tokio runtime. The first fetch happens
    /// one interval after start.
    pub fn start_for_address<S>(&self, address: Address, source: S) -> Result<PollerHandle>
    where
        S: BalanceSource + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let gate = StopGate::new();
        let (sender, receiver) = watch::channel(None);

        tracing::info!(
            address = %address.short(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting balance poller"
        );

        let task = runtime.spawn(poll_loop(
            address,
            source,
            self.interval,
            gate.clone(),
            sender,
        ));

        Ok(PollerHandle {
            address,
            gate,
            receiver,
            task: Some(task),
        })
    }
}

async fn poll_loop<S: BalanceSource>(
    address: Address,
    source: S,
    period: Duration,
    gate: StopGate,
    sender: watch::Sender<Option<BalanceSnapshot>>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = gate.stopped() => break,
            _ = ticker.tick() => {}
        }

        // Issued under the gate so no fetch begins once stop has returned.
        // Not raced against stop: an in-flight fetch runs to completion and
        // its result is discarded below if the poller was stopped meanwhile.
        let Some(fetch) = gate.run_unless_stopped(|| source.fetch_balance(&address)) else {
            break;
        };
        let value = match fetch.await.and_then(check_value) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(address = %address.short(), "Balance fetch failed: {}", e);
                continue;
            }
        };

        let snapshot = BalanceSnapshot {
            value,
            sequence: sequence + 1,
            fetched_at: Utc::now(),
        };
        let published = gate.run_unless_stopped(|| {
            sender.send_replace(Some(snapshot));
        });
        if published.is_none() {
            tracing::debug!(address = %address.short(), "Discarding balance read after stop");
            break;
        }
        sequence += 1;
    }

    tracing::debug!(address = %address.short(), "Balance poller exited");
}

fn check_value(value: f64) -> std::result::Result<f64, FetchError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FetchError::InvalidValue(value.to_string()))
    }
}

/// Handle to a running poller
///
/// Dropping the handle stops the poller.
pub struct PollerHandle {
    address: Address,
    gate: StopGate,
    receiver: watch::Receiver<Option<BalanceSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Address being polled
    pub fn address(&self) -> Address {
        self.address
    }

    /// Latest published read, `None` until the first successful fetch
    pub fn latest(&self) -> Option<BalanceSnapshot> {
        *self.receiver.borrow()
    }

    /// Latest published balance value
    pub fn balance(&self) -> Option<f64> {
        self.latest().map(|snapshot| snapshot.value)
    }

    /// Receiver notified on every published read
    pub fn subscribe(&self) -> watch::Receiver<Option<BalanceSnapshot>> {
        self.receiver.clone()
    }

    /// Whether [`PollerHandle::stop`] has been called
    pub fn is_stopped(&self) -> bool {
        self.gate.is_stopped()
    }

    /// Stop polling. Idempotent.
    ///
    /// No read is published after this returns, including one from a fetch
    /// that is still in flight.
    pub fn stop(&self) {
        if self.gate.stop() {
            tracing::info!(address = %self.address.short(), "Stopped balance poller");
        }
    }

    /// Stop and wait for the background task to finish
    ///
    /// Waits for an in-flight fetch to return.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Balance poller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollerHandle")
            .field("address", &self.address)
            .field("stopped", &self.is_stopped())
            .field("latest", &self.latest())
            .finish()
    }
}
