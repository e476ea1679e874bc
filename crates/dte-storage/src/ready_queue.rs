// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! De-duplicating FIFO of instance ids ready for a dispatch turn.

use dashmap::DashSet;
use dte_core::instance_id::InstanceId;
use tokio::sync::{mpsc, Mutex};

/// Queue of instance ids that have inbound messages and are not currently
/// loaded by a turn.
///
/// The dedup set and the channel write must be atomic per instance —
/// otherwise a release-and-reenqueue racing a fresh `push` could either drop
/// a wakeup or double-enqueue the same id (§9's "ready-to-run dedup race").
/// A single mutex around "check set, insert, send" serializes that sequence;
/// the receive side stays lock-free.
pub struct ReadyQueue {
    tx: mpsc::UnboundedSender<InstanceId>,
    rx: Mutex<mpsc::UnboundedReceiver<InstanceId>>,
    pending: DashSet<String>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Mutex::new(rx), pending: DashSet::new() }
    }

    /// Enqueue `id` if it isn't already pending. No-op otherwise (§3's
    /// "attempting to re-enqueue a pending instance is a no-op").
    pub fn push(&self, id: InstanceId) {
        let key = id.canonical();
        if self.pending.insert(key) {
            // Sender only closes when paired with a dropped receiver held by
            // this same struct, so send cannot fail while `self` is alive.
            let _ = self.tx.send(id);
        }
    }

    /// Block until an instance id is ready, removing it from the dedup set.
    ///
    /// `rx` is a `tokio::sync::Mutex` rather than `parking_lot`'s, since
    /// multiple dispatcher loops contend for it across the `.await` in
    /// `recv()` — an async-aware mutex yields here instead of parking a
    /// worker thread on an uncontended-in-practice but still-blocking lock.
    /// The sender is held by this same struct, so the channel never closes
    /// while `self` is alive; the loop just waits out a spurious `None`
    /// rather than asserting the invariant with a panic.
    pub async fn pop(&self) -> InstanceId {
        loop {
            let received = {
                let mut rx = self.rx.lock().await;
                rx.recv().await
            };
            if let Some(id) = received {
                self.pending.remove(&id.canonical());
                return id;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "ready_queue_tests.rs"]
mod tests;
