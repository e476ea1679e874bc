// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Manual-reset gate that suspends dispatch while no worker is attached (§4.8).

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::time::Duration;

/// A gate both dispatcher loops wait on before taking their next unit of
/// work. `dte-proxy` sets it once a worker attaches and resets it on
/// disconnect; `Set`/`Reset` are idempotent (§4.8).
#[derive(Default)]
pub struct TrafficSignal {
    open: AtomicBool,
    notify: Notify,
}

impl TrafficSignal {
    pub fn new() -> Self {
        Self { open: AtomicBool::new(false), notify: Notify::new() }
    }

    pub fn set(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn reset(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Block until the signal is set.
    ///
    /// Registers interest in the notification *before* checking the flag, so
    /// a `set()` landing between the check and the await can't be missed —
    /// the same race `tokio::sync::Notify`'s docs call out for this pattern.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_open() {
                return;
            }
            notified.await;
        }
    }

    /// Block until set, or until `timeout` elapses (returns `false`).
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

#[cfg(test)]
#[path = "traffic_signal_tests.rs"]
mod tests;
