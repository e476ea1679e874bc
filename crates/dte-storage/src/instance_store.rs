// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The storage interface the dispatchers are written against (§4.1).

use crate::query::QueryPage;
use async_trait::async_trait;
use dte_core::instance_id::InstanceId;
use dte_core::message::TaskMessage;
use dte_core::query::OrchestrationQuery;
use dte_core::status::OrchestrationStatus;

/// The outcome of one dispatch turn, committed atomically by `save_turn`.
///
/// Continue-as-new is detected by comparing `status.execution_id` against
/// the record's currently stored execution id, rather than carrying a
/// separate self-addressed message — `SaveTurn`'s own description in §4.1
/// says it "detects continue-as-new via execution-id change", so the change
/// itself is the signal.
#[derive(Debug, Clone, Default)]
pub struct TurnResult {
    pub new_history_events: Vec<dte_core::history::HistoryEvent>,
    pub status: Option<OrchestrationStatus>,
    pub outbound_orchestrator_messages: Vec<TaskMessage>,
    pub timer_messages: Vec<TaskMessage>,
    pub outbound_activity_messages: Vec<TaskMessage>,
}

/// Per-instance state, dispatch coordination, and query/purge, all in one
/// trait so dispatchers and the client façade depend on an interface rather
/// than the in-memory reference backend directly.
#[async_trait]
pub trait InstanceStore: Send + Sync + 'static {
    /// Route `msg` to its target instance (§4.1 `AddMessage`).
    async fn add_message(&self, msg: TaskMessage);

    /// Block until an instance is ready, materializing and locking it.
    /// Returns the instance id, its history, and its drained inbox.
    async fn get_next_ready_to_run_instance(
        &self,
    ) -> (InstanceId, Vec<dte_core::history::HistoryEvent>, Vec<TaskMessage>);

    /// Commit a turn's outcome atomically.
    async fn save_turn(&self, id: &InstanceId, result: TurnResult);

    /// Release the load flag, re-enqueueing to ready-to-run if the inbox is
    /// non-empty. Fatal (logged, not panicked) if the instance isn't loaded.
    async fn release_lock(&self, id: &InstanceId);

    /// Restore a turn's messages to the inbox after abandonment, then
    /// release the lock.
    async fn abandon_turn(&self, id: &InstanceId, messages: Vec<TaskMessage>);

    async fn try_get_status(&self, id: &InstanceId) -> Option<OrchestrationStatus>;

    /// Wait for the instance to reach a terminal status. Returns `None` if
    /// the instance doesn't exist (eventually-consistent creation, §7.2).
    async fn wait_for_completion(&self, id: &InstanceId) -> Option<OrchestrationStatus>;

    async fn query_all(&self, query: OrchestrationQuery) -> QueryPage;

    /// Returns 1 if the instance existed and was completed, else 0.
    async fn purge_one(&self, id: &InstanceId) -> usize;

    /// Returns the count of completed instances actually removed.
    async fn purge_all(&self, query: OrchestrationQuery) -> usize;
}
