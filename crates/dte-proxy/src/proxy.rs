// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! `ExecutorProxy`: implements [`Executor`] by forwarding to whatever
//! worker is currently attached, and exposes the two completion entry
//! points a transport layer calls once it decodes a worker response
//! (§4.7).

use crate::connection::{AttachHandle, ConnectionConfig, ConnectionManager};
use crate::error::{ProxyError, ProxyResult};
use crate::work_item::WorkItem;
use async_trait::async_trait;
use dashmap::DashMap;
use dte_core::error::{EngineError, EngineResult};
use dte_core::instance_id::InstanceId;
use dte_core::status::FailureDetails;
use dte_engine::executor::{ActivityOutcome, ActivityRequest, Executor, OrchestratorRequest, OrchestratorResponse};
use dte_engine::traffic_signal::TrafficSignal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;

/// What a worker reports back for one activity invocation (§6:
/// "`ActivityResponse`. Either `result` or `failureDetails` is set (never
/// both; neither is a protocol error interpreted as empty result)").
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActivityCompletion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureDetails>,
}

impl From<ActivityCompletion> for ActivityOutcome {
    fn from(c: ActivityCompletion) -> Self {
        match c.failure {
            Some(failure) => ActivityOutcome::Failed { failure },
            None => ActivityOutcome::Completed { result: c.result },
        }
    }
}

fn activity_key(instance: &InstanceId, task_id: i64) -> (String, i64) {
    (instance.canonical(), task_id)
}

/// Implements [`dte_engine::Executor`] over the attach-one-worker protocol.
///
/// Correlation keys match §4.7: orchestrator completions are keyed by
/// `instanceId` alone (only one turn per instance runs at a time, so that's
/// unambiguous); activity completions are keyed by `(instanceId, taskId)`.
pub struct ExecutorProxy {
    connection: Arc<ConnectionManager>,
    pending_orchestrator: DashMap<String, oneshot::Sender<OrchestratorResponse>>,
    pending_activity: DashMap<(String, i64), oneshot::Sender<ActivityCompletion>>,
}

impl ExecutorProxy {
    pub fn new(signal: Arc<TrafficSignal>, config: ConnectionConfig) -> Arc<Self> {
        Arc::new(Self {
            connection: Arc::new(ConnectionManager::new(signal, config)),
            pending_orchestrator: DashMap::new(),
            pending_activity: DashMap::new(),
        })
    }

    /// Accept a worker's `GetWorkItems` stream (§4.7). Fails if a worker is
    /// already attached and doesn't detach within the reconnect grace
    /// window.
    pub async fn attach(self: &Arc<Self>) -> ProxyResult<AttachHandle> {
        self.connection.attach().await
    }

    pub fn is_attached(&self) -> bool {
        self.connection.is_attached()
    }

    /// A worker's `CompleteOrchestratorTask` RPC.
    pub fn complete_orchestrator_task(&self, instance: &InstanceId, response: OrchestratorResponse) -> ProxyResult<()> {
        let key = instance.canonical();
        match self.pending_orchestrator.remove(&key) {
            Some((_, tx)) => {
                // Receiver may already be gone (turn was abandoned by a
                // timeout); that's not a protocol error, just a stale
                // completion arriving too late to matter.
                let _ = tx.send(response);
                Ok(())
            }
            None => {
                tracing::warn!(instance_id = %instance, "completion for unknown orchestrator correlation key");
                Err(ProxyError::UnknownCorrelation(key))
            }
        }
    }

    /// A worker's `CompleteActivityTask` RPC.
    pub fn complete_activity_task(
        &self,
        instance: &InstanceId,
        task_id: i64,
        completion: ActivityCompletion,
    ) -> ProxyResult<()> {
        let key = activity_key(instance, task_id);
        match self.pending_activity.remove(&key) {
            Some((_, tx)) => {
                let _ = tx.send(completion);
                Ok(())
            }
            None => {
                tracing::warn!(instance_id = %instance, task_id, "completion for unknown activity correlation key");
                Err(ProxyError::UnknownCorrelation(format!("{instance}/{task_id}")))
            }
        }
    }

    /// Drop every pending correlation without resolving it, causing the
    /// corresponding `execute_*` call to return `WorkerDisconnected`.
    ///
    /// Used only on host shutdown (§4.7: in-flight completion sources
    /// resolve "on reconnect... or on explicit shutdown via context
    /// cancellation") — an ordinary disconnect leaves pending entries alone
    /// so a reconnecting worker can still complete them.
    pub fn shutdown(&self) {
        self.pending_orchestrator.clear();
        self.pending_activity.clear();
    }
}

#[async_trait]
impl Executor for ExecutorProxy {
    async fn execute_orchestrator(&self, request: OrchestratorRequest) -> EngineResult<OrchestratorResponse> {
        let key = request.instance.canonical();
        let (tx, rx) = oneshot::channel();
        self.pending_orchestrator.insert(key.clone(), tx);

        if self.connection.send(WorkItem::Orchestrator(request)).await.is_err() {
            self.pending_orchestrator.remove(&key);
            return Err(EngineError::WorkerDisconnected);
        }

        rx.await.map_err(|_| EngineError::WorkerDisconnected)
    }

    async fn execute_activity(&self, request: ActivityRequest) -> EngineResult<ActivityOutcome> {
        let key = activity_key(&request.instance, request.task_id);
        let (tx, rx) = oneshot::channel();
        self.pending_activity.insert(key.clone(), tx);

        if self.connection.send(WorkItem::Activity(request)).await.is_err() {
            self.pending_activity.remove(&key);
            return Err(EngineError::WorkerDisconnected);
        }

        rx.await.map(ActivityOutcome::from).map_err(|_| EngineError::WorkerDisconnected)
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
