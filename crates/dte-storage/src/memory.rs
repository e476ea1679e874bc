// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! In-memory reference implementation of [`crate::InstanceStore`].

use crate::activity_queue::ActivityQueue;
use crate::delayed::{scheduled_delay, DelayedQueue};
use crate::instance_record::InstanceRecord;
use crate::instance_store::{InstanceStore, TurnResult};
use crate::query::{self, QueryPage};
use crate::ready_queue::ReadyQueue;
use async_trait::async_trait;
use dashmap::DashMap;
use dte_core::history::HistoryEvent;
use dte_core::instance_id::InstanceId;
use dte_core::message::TaskMessage;
use dte_core::query::OrchestrationQuery;
use dte_core::status::{OrchestrationStatus, RuntimeStatus};
use std::sync::Arc;

struct Entry {
    id: InstanceId,
    record: Arc<InstanceRecord>,
}

/// Reference backend: record map keyed by case-insensitive `InstanceId`
/// (§6). Nothing here is persisted to disk — restart loses all state,
/// exactly as the out-of-scope note in §1 intends.
pub struct InMemoryInstanceStore {
    records: DashMap<String, Entry>,
    ready: ReadyQueue,
    activity_queue: Arc<ActivityQueue>,
    delayed: Arc<DelayedQueue>,
}

impl InMemoryInstanceStore {
    pub fn new(activity_queue: Arc<ActivityQueue>, delayed: Arc<DelayedQueue>) -> Self {
        Self { records: DashMap::new(), ready: ReadyQueue::new(), activity_queue, delayed }
    }

    fn pending_ready(&self) -> &ReadyQueue {
        &self.ready
    }

    async fn route(&self, msg: TaskMessage, now: chrono::DateTime<chrono::Utc>) {
        // Deferred delivery is checked before any record mutation so a
        // scheduled message doesn't touch the record twice: once when it
        // first arrives and once when the delayed queue re-routes it at its
        // deadline. The second pass (delay has since elapsed) falls through
        // to the ordinary creation/dedup logic below exactly once.
        if let Some(delay) = scheduled_delay(&msg.event, now) {
            self.delayed.schedule(msg, delay).await;
            return;
        }

        let key = msg.instance.canonical();

        if let HistoryEvent::ExecutionStarted {
            execution_id, name, version, input, timestamp, tags, ..
        } = &msg.event
        {
            let mut fresh_status = OrchestrationStatus::builder()
                .name(name.clone())
                .version(version.clone())
                .execution_id(execution_id.clone())
                .runtime_status(RuntimeStatus::Pending)
                .tags(tags.clone())
                .input(input.clone().unwrap_or(serde_json::Value::Null))
                .build();
            fresh_status.created_at = *timestamp;
            fresh_status.last_updated_at = *timestamp;

            // Read-then-write without holding the map guard across `insert`,
            // which would deadlock DashMap's sharded locking.
            let already_completed = self.records.get(&key).map(|e| e.record.is_completed());
            let should_push_to_inbox = match already_completed {
                None => {
                    self.records.insert(
                        key.clone(),
                        Entry { id: msg.instance.clone(), record: Arc::new(InstanceRecord::with_status(fresh_status)) },
                    );
                    true
                }
                Some(true) => {
                    if let Some(entry) = self.records.get(&key) {
                        entry.record.reset(fresh_status);
                    }
                    true
                }
                Some(false) => {
                    tracing::warn!(
                        instance_id = %msg.instance,
                        "ExecutionStarted rejected: instance already exists and is not completed",
                    );
                    false
                }
            };
            if !should_push_to_inbox {
                return;
            }
        } else {
            match self.records.get(&key) {
                Some(entry) if entry.record.is_completed() => {
                    tracing::debug!(instance_id = %msg.instance, "dropping message for completed instance");
                    return;
                }
                None => {
                    // Lazily created on first message, per §3's lifecycle note.
                    self.records.insert(
                        key.clone(),
                        Entry { id: msg.instance.clone(), record: Arc::new(InstanceRecord::new()) },
                    );
                }
                Some(_) => {}
            }
        }

        let entry_ref = self.records.get(&key);
        if let Some(entry) = entry_ref {
            let needs_enqueue = entry.record.push_inbox(msg);
            if needs_enqueue {
                self.pending_ready().push(entry.id.clone());
            }
        }
    }
}

#[async_trait]
impl InstanceStore for InMemoryInstanceStore {
    async fn add_message(&self, msg: TaskMessage) {
        self.route(msg, chrono::Utc::now()).await;
    }

    async fn get_next_ready_to_run_instance(
        &self,
    ) -> (InstanceId, Vec<HistoryEvent>, Vec<TaskMessage>) {
        loop {
            let id = self.ready.pop().await;
            let key = id.canonical();
            if let Some(entry) = self.records.get(&key) {
                let (history, inbox) = entry.record.load();
                return (id, history, inbox);
            }
            // Record was purged between enqueue and pop; try the next one.
        }
    }

    async fn save_turn(&self, id: &InstanceId, result: TurnResult) {
        let key = id.canonical();
        let Some(status) = result.status else {
            tracing::warn!(instance_id = %id, "save_turn called without a status");
            return;
        };
        let reset_history = self
            .records
            .get(&key)
            .and_then(|e| e.record.status())
            .map(|prev| prev.execution_id != status.execution_id)
            .unwrap_or(false);

        if let Some(entry) = self.records.get(&key) {
            entry.record.commit_turn(reset_history, result.new_history_events, status);
        }

        for msg in result.outbound_orchestrator_messages {
            self.route(msg, chrono::Utc::now()).await;
        }
        for msg in result.timer_messages {
            self.route(msg, chrono::Utc::now()).await;
        }
        self.activity_queue.enqueue_many(result.outbound_activity_messages);
    }

    async fn release_lock(&self, id: &InstanceId) {
        let key = id.canonical();
        if let Some(entry) = self.records.get(&key) {
            let needs_reenqueue = entry.record.release();
            if needs_reenqueue {
                self.pending_ready().push(entry.id.clone());
            }
        } else {
            tracing::error!(instance_id = %id, "release_lock on unknown instance");
        }
    }

    async fn abandon_turn(&self, id: &InstanceId, messages: Vec<TaskMessage>) {
        let key = id.canonical();
        if let Some(entry) = self.records.get(&key) {
            entry.record.abandon(messages);
        }
        self.release_lock(id).await;
    }

    async fn try_get_status(&self, id: &InstanceId) -> Option<OrchestrationStatus> {
        self.records.get(&id.canonical()).and_then(|e| e.record.status())
    }

    async fn wait_for_completion(&self, id: &InstanceId) -> Option<OrchestrationStatus> {
        let record = self.records.get(&id.canonical()).map(|e| e.record.clone())?;
        Some(record.wait_for_completion().await)
    }

    async fn query_all(&self, query: OrchestrationQuery) -> QueryPage {
        let skip = query::parse_cursor(query.continuation_token.as_ref());
        let page_size = if query.page_size == 0 { 100 } else { query.page_size };
        let mut instances = Vec::new();
        let mut examined = 0usize;
        for entry in self.records.iter().skip(skip) {
            examined += 1;
            if let Some(status) = entry.record.status() {
                if query::matches(&query, &entry.id, &status) {
                    instances.push(status);
                    if instances.len() >= page_size {
                        break;
                    }
                }
            }
        }
        let continuation_token =
            if examined + skip < self.records.len() { Some(query::encode_cursor(skip + examined)) } else { None };
        QueryPage { instances, continuation_token }
    }

    async fn purge_one(&self, id: &InstanceId) -> usize {
        let key = id.canonical();
        let completed = self.records.get(&key).map(|e| e.record.is_completed()).unwrap_or(false);
        if completed {
            self.records.remove(&key);
            1
        } else {
            0
        }
    }

    async fn purge_all(&self, query: OrchestrationQuery) -> usize {
        let mut removed = 0usize;
        let candidates: Vec<String> = self
            .records
            .iter()
            .filter(|entry| {
                entry.record.is_completed()
                    && entry.record.status().map(|s| query::matches(&query, &entry.id, &s)).unwrap_or(false)
            })
            .map(|entry| entry.key().clone())
            .collect();
        for key in candidates {
            if self.records.remove(&key).is_some() {
                removed += 1;
            }
        }
        removed
    }
}

impl InMemoryInstanceStore {
    /// Drive the delayed queue: wait for each scheduled message's deadline
    /// and re-route it exactly as a fresh `AddMessage` (§4.3 "fires scheduled
    /// messages when their release time arrives"). Runs until the store is
    /// dropped or `shutdown` resolves, whichever comes first — the caller
    /// spawns this as a background task alongside the dispatchers.
    pub async fn run_delayed_pump(self: &Arc<Self>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            tokio::select! {
                released = self.delayed.next_released() => {
                    match released {
                        Some(msg) => self.route(msg, chrono::Utc::now()).await,
                        None => {
                            // No timers outstanding right now; avoid busy-looping
                            // while still noticing new ones scheduled concurrently.
                            tokio::select! {
                                _ = tokio::time::sleep(std::time::Duration::from_millis(20)) => {}
                                _ = shutdown.changed() => if *shutdown.borrow() { return },
                            }
                        }
                    }
                }
                _ = shutdown.changed() => if *shutdown.borrow() { return },
            }
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
