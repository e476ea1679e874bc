// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The per-instance monitor: the unit of exclusive access a dispatch turn
//! locks for its duration.

use dte_core::history::HistoryEvent;
use dte_core::message::TaskMessage;
use dte_core::status::OrchestrationStatus;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Mutable state guarded by one instance's monitor.
///
/// Exactly the fields §3 names as under the per-record lock: history, inbox,
/// status, the load flag, and completion. `parking_lot::Mutex` rather than a
/// global lock, since the invariant is per-instance exclusion, not
/// system-wide exclusion.
pub struct InstanceRecord {
    inner: Mutex<Inner>,
    completion_tx: watch::Sender<Option<OrchestrationStatus>>,
}

struct Inner {
    pub history: Vec<HistoryEvent>,
    pub inbox: Vec<TaskMessage>,
    pub status: Option<OrchestrationStatus>,
    pub is_loaded: bool,
    /// Set by `commit_turn` when a turn truncated history for a non-terminal
    /// status (continue-as-new): the next generation has nothing in its
    /// inbox to wake it, so `release` must re-enqueue unconditionally.
    pub pending_requeue: bool,
}

impl InstanceRecord {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Mutex::new(Inner {
                history: Vec::new(),
                inbox: Vec::new(),
                status: None,
                is_loaded: false,
                pending_requeue: false,
            }),
            completion_tx: tx,
        }
    }

    pub fn with_status(status: OrchestrationStatus) -> Self {
        let record = Self::new();
        record.inner.lock().status = Some(status);
        record
    }

    pub fn is_completed(&self) -> bool {
        self.inner.lock().status.as_ref().map(|s| s.runtime_status.is_terminal()).unwrap_or(false)
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().is_loaded
    }

    pub fn status(&self) -> Option<OrchestrationStatus> {
        self.inner.lock().status.clone()
    }

    /// Append `msg` to the inbox. Returns `true` if the record was not
    /// loaded at the time of append, meaning the caller should enqueue it
    /// onto the ready-to-run queue.
    pub fn push_inbox(&self, msg: TaskMessage) -> bool {
        let mut guard = self.inner.lock();
        guard.inbox.push(msg);
        !guard.is_loaded
    }

    /// Reset the record for a fresh execution: clear history, clear
    /// completion, and install the given status as Pending.
    pub fn reset(&self, status: OrchestrationStatus) {
        let mut guard = self.inner.lock();
        guard.history.clear();
        guard.status = Some(status);
    }

    /// Materialize `(history, drained inbox)` and mark the record loaded.
    /// Caller must already hold the ready-to-run dequeue guarantee that no
    /// other turn is concurrently loading this record.
    pub fn load(&self) -> (Vec<HistoryEvent>, Vec<TaskMessage>) {
        let mut guard = self.inner.lock();
        guard.is_loaded = true;
        let history = guard.history.clone();
        let inbox = std::mem::take(&mut guard.inbox);
        (history, inbox)
    }

    /// Commit a turn's outcome: continue-as-new truncation (if `reset_history`
    /// is set), append `new_events`, and install the new status. Signals
    /// completion waiters if the new status is terminal.
    pub fn commit_turn(
        &self,
        reset_history: bool,
        new_events: Vec<HistoryEvent>,
        status: OrchestrationStatus,
    ) {
        let mut guard = self.inner.lock();
        if reset_history {
            guard.history.clear();
        }
        guard.history.extend(new_events);
        let terminal = status.runtime_status.is_terminal();
        if reset_history && !terminal {
            guard.pending_requeue = true;
        }
        guard.status = Some(status.clone());
        if terminal {
            let _ = self.completion_tx.send(Some(status));
        }
    }

    /// Release the load flag. Returns `true` if the inbox is non-empty or a
    /// continue-as-new turn just committed, meaning the caller should
    /// re-enqueue onto the ready-to-run queue.
    pub fn release(&self) -> bool {
        let mut guard = self.inner.lock();
        guard.is_loaded = false;
        let requeue = !guard.inbox.is_empty() || guard.pending_requeue;
        guard.pending_requeue = false;
        requeue
    }

    /// Restore abandoned messages to the inbox without touching the load
    /// flag (the caller separately calls `release`).
    pub fn abandon(&self, messages: Vec<TaskMessage>) {
        self.inner.lock().inbox.extend(messages);
    }

    /// Wait for the instance to reach a terminal status, returning
    /// immediately if it's already there.
    ///
    /// Subscribes before checking the current status, so a completion that
    /// lands between the check and a naive "subscribe then check" can't be
    /// missed (§4.1: "registered before the check").
    pub async fn wait_for_completion(&self) -> OrchestrationStatus {
        let mut rx = self.completion_tx.subscribe();
        if let Some(status) = self.status() {
            if status.runtime_status.is_terminal() {
                return status;
            }
        }
        loop {
            if let Some(status) = rx.borrow().clone() {
                return status;
            }
            if rx.changed().await.is_err() {
                if let Some(status) = self.status() {
                    return status;
                }
            }
        }
    }
}

impl Default for InstanceRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "instance_record_tests.rs"]
mod tests;
