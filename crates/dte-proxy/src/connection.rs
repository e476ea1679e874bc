// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The single-worker attachment slot (§4.7).
//!
//! At most one worker stream is attached at a time. A second `attach` call
//! doesn't fail immediately — it waits out a short grace window so a
//! worker that's cleanly reconnecting (old stream tearing down, new one
//! coming up) doesn't get a spurious rejection — then fails with
//! [`ProxyError::AlreadyConnected`] if the slot is still occupied.

use crate::error::{ProxyError, ProxyResult};
use crate::work_item::WorkItem;
use dte_engine::traffic_signal::TrafficSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

/// Tunables for the attachment slot.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// How long a second `attach` waits for the current worker to detach
    /// before failing (§4.7's "brief retry window").
    pub reconnect_grace: Duration,
    /// Outbound channel capacity. Writes are additionally serialized by a
    /// lock around the send call (§5: "the worker-bound stream is guarded
    /// by a single lock/semaphore to serialize frame writes"), so this only
    /// bounds how far the dispatcher can get ahead of a slow worker.
    pub outbound_buffer: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { reconnect_grace: Duration::from_secs(5), outbound_buffer: 32 }
    }
}

struct Slot {
    outbound: tokio::sync::Mutex<mpsc::Sender<WorkItem>>,
}

/// Owns the attachment slot and the traffic signal it gates.
pub struct ConnectionManager {
    signal: Arc<TrafficSignal>,
    config: ConnectionConfig,
    slot: parking_lot::Mutex<Option<Arc<Slot>>>,
    detached: Notify,
}

impl ConnectionManager {
    pub fn new(signal: Arc<TrafficSignal>, config: ConnectionConfig) -> Self {
        Self { signal, config, slot: parking_lot::Mutex::new(None), detached: Notify::new() }
    }

    /// Attach a new worker stream, waiting out the reconnect grace window
    /// if one is already attached.
    pub async fn attach(self: &Arc<Self>) -> ProxyResult<AttachHandle> {
        let deadline = Instant::now() + self.config.reconnect_grace;
        loop {
            if let Some(handle) = self.try_attach() {
                return Ok(handle);
            }
            if Instant::now() >= deadline {
                return Err(ProxyError::AlreadyConnected);
            }
            let notified = self.detached.notified();
            let remaining = deadline.saturating_duration_since(Instant::now());
            let _ = tokio::time::timeout(remaining, notified).await;
        }
    }

    fn try_attach(self: &Arc<Self>) -> Option<AttachHandle> {
        let mut guard = self.slot.lock();
        if guard.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer);
        *guard = Some(Arc::new(Slot { outbound: tokio::sync::Mutex::new(tx) }));
        drop(guard);
        self.signal.set();
        Some(AttachHandle { manager: Arc::clone(self), receiver: rx, detached: false })
    }

    /// Release the slot (worker disconnected). Idempotent.
    fn detach(&self) {
        *self.slot.lock() = None;
        self.signal.reset();
        self.detached.notify_waiters();
    }

    pub fn is_attached(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Send one work item to the attached worker, serializing with any
    /// other in-flight write.
    pub async fn send(&self, item: WorkItem) -> ProxyResult<()> {
        let slot = self.slot.lock().clone();
        let slot = slot.ok_or(ProxyError::NotConnected)?;
        let sender = slot.outbound.lock().await;
        sender.send(item).await.map_err(|_| ProxyError::NotConnected)
    }
}

/// A worker's live connection. Dropping it (disconnect, or explicit
/// [`AttachHandle::detach`]) releases the slot and resets the traffic
/// signal (§4.7 shutdown semantics).
pub struct AttachHandle {
    manager: Arc<ConnectionManager>,
    receiver: mpsc::Receiver<WorkItem>,
    detached: bool,
}

impl AttachHandle {
    /// Receive the next work item dispatched to this worker.
    pub async fn recv(&mut self) -> Option<WorkItem> {
        self.receiver.recv().await
    }

    /// Explicitly detach, equivalent to dropping this handle.
    pub fn detach(mut self) {
        self.manager.detach();
        self.detached = true;
    }
}

impl Drop for AttachHandle {
    fn drop(&mut self) {
        if !self.detached {
            self.manager.detach();
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
