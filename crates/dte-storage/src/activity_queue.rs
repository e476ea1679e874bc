// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! FIFO of pending activity task messages.

use dashmap::DashSet;
use dte_core::message::TaskMessage;
use tokio::sync::{mpsc, Mutex};

/// Unbounded FIFO feeding the activity dispatcher.
///
/// `SequenceNumber` is the dedup key (§3): each message is enqueued at most
/// once per sequence number, mirroring how the ready-to-run queue dedups on
/// `InstanceId`. Future-dated messages never land here directly — the
/// delayed queue holds them until their deadline, then pushes them on
/// (§4.2/§4.3).
pub struct ActivityQueue {
    tx: mpsc::UnboundedSender<TaskMessage>,
    rx: Mutex<mpsc::UnboundedReceiver<TaskMessage>>,
    pending: DashSet<u64>,
}

impl ActivityQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Mutex::new(rx), pending: DashSet::new() }
    }

    pub fn enqueue(&self, msg: TaskMessage) {
        if self.pending.insert(msg.sequence_number) {
            let _ = self.tx.send(msg);
        }
    }

    pub fn enqueue_many(&self, messages: impl IntoIterator<Item = TaskMessage>) {
        for msg in messages {
            self.enqueue(msg);
        }
    }

    /// Restore a message that failed before producing a result
    /// (`AbandonActivity`, §4.5 step 5). Activities are at-least-once.
    ///
    /// Reassigns a fresh sequence number rather than reusing the original —
    /// see the resolved Open Question on abandon semantics in `DESIGN.md`.
    pub fn abandon(&self, msg: TaskMessage) {
        self.enqueue(msg.resequenced());
    }

    pub async fn dequeue(&self) -> TaskMessage {
        loop {
            let received = {
                let mut rx = self.rx.lock().await;
                rx.recv().await
            };
            if let Some(msg) = received {
                self.pending.remove(&msg.sequence_number);
                return msg;
            }
        }
    }
}

impl Default for ActivityQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "activity_queue_tests.rs"]
mod tests;
