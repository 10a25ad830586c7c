//! Stop signal shared between a poller task and its handle.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// One-way stop flag that also serializes publishing against stopping.
///
/// [`StopGate::stop`] takes the same lock as [`StopGate::run_unless_stopped`],
/// so once `stop` returns no gated closure can start or still be running.
#[derive(Clone)]
pub struct StopGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    stopped: Mutex<bool>,
    notify: Notify,
}

impl StopGate {
    /// Create a new gate in the running state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GateInner {
                stopped: Mutex::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Returns `true` once [`StopGate::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        *self.inner.stopped.lock()
    }

    /// Stop and wake any waiters. Idempotent.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn stop(&self) -> bool {
        let first = {
            let mut stopped = self.inner.stopped.lock();
            !std::mem::replace(&mut *stopped, true)
        };
        self.inner.notify.notify_waiters();
        first
    }

    /// Run `f` only if not yet stopped, returning its output if it ran.
    pub fn run_unless_stopped<T, F: FnOnce() -> T>(&self, f: F) -> Option<T> {
        let stopped = self.inner.stopped.lock();
        if *stopped {
            return None;
        }
        Some(f())
    }

    /// Await until [`StopGate::stop`] is called.
    pub async fn stopped(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking so a concurrent stop cannot be missed
        notified.as_mut().enable();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

impl Default for StopGate {
    fn default() -> Self {
        Self::new()
    }
}
