// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! `TaskHubClient`: the client-facing operations of §6, translated into
//! `InstanceStore` calls.
//!
//! This is a thin façade, not a business-logic layer — nearly every method
//! is "build the right `HistoryEvent`, wrap it in a `TaskMessage`, call
//! `add_message`". The one piece of actual policy is `schedule_new`'s
//! duplicate-creation check (§7.1), since `InstanceStore::add_message` is a
//! fire-and-forget routing call with no return value to carry that error
//! back through.

use crate::request::ScheduleNewRequest;
use dte_core::error::{EngineError, EngineResult};
use dte_core::execution_id::ExecutionId;
use dte_core::history::{HistoryEvent, UNASSIGNED_EVENT_ID};
use dte_core::instance_id::InstanceId;
use dte_core::message::TaskMessage;
use dte_core::query::OrchestrationQuery;
use dte_core::status::{OrchestrationStatus, RuntimeStatus};
use dte_storage::instance_store::InstanceStore;
use dte_storage::query::QueryPage;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runtime statuses that reject a second `schedule_new` for the same
/// instance id (§7.1's "configurable dedup set (default: Pending or
/// Running)").
fn default_dedup_statuses() -> Vec<RuntimeStatus> {
    vec![RuntimeStatus::Pending, RuntimeStatus::Running]
}

/// Polling interval for [`TaskHubClient::wait_for_start`] (§6: "≤ 500 ms").
const WAIT_FOR_START_INTERVAL: Duration = Duration::from_millis(250);

pub struct TaskHubClient<S> {
    store: Arc<S>,
    dedup_statuses: Vec<RuntimeStatus>,
}

impl<S: InstanceStore> TaskHubClient<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, dedup_statuses: default_dedup_statuses() }
    }

    /// Override the dedup set checked by `schedule_new` (§9: "configurable
    /// policy").
    pub fn with_dedup_statuses(mut self, statuses: Vec<RuntimeStatus>) -> Self {
        self.dedup_statuses = statuses;
        self
    }

    pub async fn schedule_new(&self, request: ScheduleNewRequest) -> EngineResult<InstanceId> {
        let id = match request.instance_id {
            Some(raw) => InstanceId::new(raw),
            None => InstanceId::generate(),
        };

        if let Some(existing) = self.store.try_get_status(&id).await {
            if self.dedup_statuses.contains(&existing.runtime_status) {
                return Err(EngineError::AlreadyExists(id.to_string()));
            }
        }

        let event = HistoryEvent::ExecutionStarted {
            event_id: UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            execution_id: ExecutionId::new(),
            name: request.name,
            version: request.version,
            input: request.input,
            parent_instance: None,
            parent_task_id: None,
            scheduled_start_time: request.scheduled_start_time,
            tags: request.tags,
        };
        self.store.add_message(TaskMessage::new(id.clone(), event)).await;
        Ok(id)
    }

    pub async fn raise_event(&self, id: &InstanceId, event_name: impl Into<String>, payload: Option<serde_json::Value>) {
        let event = HistoryEvent::EventRaised {
            event_id: UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            name: event_name.into(),
            input: payload,
        };
        self.store.add_message(TaskMessage::new(id.clone(), event)).await;
    }

    /// Terminate a running instance. `recursive` is accepted for interface
    /// completeness (§6) but cascading termination to sub-orchestrations is
    /// not implemented: the reference store has no parent→children index
    /// (only a child's `ExecutionStarted` carries its `parent_instance`),
    /// so recursive termination would require a full scan the `query`
    /// interface doesn't expose a parent filter for. Logged, not silently
    /// dropped.
    pub async fn terminate(&self, id: &InstanceId, output: Option<serde_json::Value>, recursive: bool) {
        if recursive {
            tracing::warn!(instance_id = %id, "recursive terminate requested but not supported by the reference store; terminating only this instance");
        }
        let event = HistoryEvent::ExecutionTerminated {
            event_id: UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            reason: output,
        };
        self.store.add_message(TaskMessage::new(id.clone(), event)).await;
    }

    pub async fn suspend(&self, id: &InstanceId, reason: Option<String>) {
        let event =
            HistoryEvent::ExecutionSuspended { event_id: UNASSIGNED_EVENT_ID, timestamp: chrono::Utc::now(), reason };
        self.store.add_message(TaskMessage::new(id.clone(), event)).await;
    }

    pub async fn resume(&self, id: &InstanceId, reason: Option<String>) {
        let event =
            HistoryEvent::ExecutionResumed { event_id: UNASSIGNED_EVENT_ID, timestamp: chrono::Utc::now(), reason };
        self.store.add_message(TaskMessage::new(id.clone(), event)).await;
    }

    pub async fn get_instance(&self, id: &InstanceId) -> Option<OrchestrationStatus> {
        self.store.try_get_status(id).await
    }

    /// Poll until the instance leaves `Pending`, or until `cancel` fires.
    pub async fn wait_for_start(&self, id: &InstanceId, cancel: &CancellationToken) -> Option<OrchestrationStatus> {
        loop {
            if let Some(status) = self.store.try_get_status(id).await {
                if status.runtime_status != RuntimeStatus::Pending {
                    return Some(status);
                }
            }
            tokio::select! {
                _ = tokio::time::sleep(WAIT_FOR_START_INTERVAL) => {}
                _ = cancel.cancelled() => return None,
            }
        }
    }

    pub async fn wait_for_completion(&self, id: &InstanceId, cancel: &CancellationToken) -> Option<OrchestrationStatus> {
        tokio::select! {
            status = self.store.wait_for_completion(id) => status,
            _ = cancel.cancelled() => None,
        }
    }

    pub async fn query(&self, query: OrchestrationQuery) -> QueryPage {
        self.store.query_all(query).await
    }

    pub async fn purge(&self, id: &InstanceId) -> usize {
        self.store.purge_one(id).await
    }

    pub async fn purge_all(&self, query: OrchestrationQuery) -> usize {
        self.store.purge_all(query).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
