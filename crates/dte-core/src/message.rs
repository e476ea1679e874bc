// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Messages carried on the ready-to-run and activity queues.

use crate::history::HistoryEvent;
use crate::instance_id::InstanceId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic counter handed out to new [`TaskMessage`]s.
///
/// The number only needs to order messages relative to each other within
/// this process's queues; it is never persisted or compared across restarts.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A single event addressed to a specific instance's orchestrator.
///
/// This is the unit the ready-to-run queue and the activity-completion path
/// move around: an event plus the instance it targets, stamped with a
/// sequence number so the queue can report arrival order for diagnostics
/// without relying on wall-clock timestamps.
#[derive(Debug, Clone)]
pub struct TaskMessage {
    pub instance: InstanceId,
    pub event: HistoryEvent,
    pub sequence_number: u64,
}

impl TaskMessage {
    pub fn new(instance: InstanceId, event: HistoryEvent) -> Self {
        Self { instance, event, sequence_number: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed) }
    }

    /// Rebuild this message with a fresh sequence number, keeping its
    /// instance and event.
    ///
    /// Used when reinserting a message after abandonment: reusing the
    /// original number risks colliding with the activity queue's dedup key
    /// if another message was enqueued with that number in the meantime.
    pub fn resequenced(self) -> Self {
        Self::new(self.instance, self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::UNASSIGNED_EVENT_ID;
    use chrono::Utc;

    fn generic(data: serde_json::Value) -> HistoryEvent {
        HistoryEvent::GenericEvent { event_id: UNASSIGNED_EVENT_ID, timestamp: Utc::now(), data }
    }

    #[test]
    fn sequence_numbers_increase_monotonically() {
        let a = TaskMessage::new(InstanceId::new("inst-a"), generic(serde_json::json!(1)));
        let b = TaskMessage::new(InstanceId::new("inst-b"), generic(serde_json::json!(2)));
        assert!(b.sequence_number > a.sequence_number);
    }
}
