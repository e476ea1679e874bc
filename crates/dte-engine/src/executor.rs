// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The remote-worker boundary the dispatchers invoke (§4.7's `ITaskExecutor`).
//!
//! Nothing in this module talks to a transport — [`dte-proxy`] provides the
//! implementation that forwards requests to a connected worker over the
//! duplex channel protocol; tests provide in-process fakes instead.

use async_trait::async_trait;
use dte_core::error::EngineResult;
use dte_core::execution_id::ExecutionId;
use dte_core::history::HistoryEvent;
use dte_core::instance_id::InstanceId;
use dte_core::message::TaskMessage;
use dte_core::status::FailureDetails;
use serde::{Deserialize, Serialize};

/// One orchestrator turn's worth of replay input (§4.4 step 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorRequest {
    pub instance: InstanceId,
    pub execution_id: ExecutionId,
    /// Committed history from prior turns of this execution.
    pub past_events: Vec<HistoryEvent>,
    /// Inbox messages delivered for this turn, in FIFO arrival order.
    pub new_events: Vec<TaskMessage>,
}

/// What the worker decided this turn should do (§4.4 step 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    pub actions: Vec<dte_core::actions::OrchestratorAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<serde_json::Value>,
}

/// One activity invocation (§4.5 step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRequest {
    pub instance: InstanceId,
    pub execution_id: ExecutionId,
    /// The orchestrator's `ScheduleTask` correlator; echoed back on
    /// completion so the right pending task is resolved (§4.7).
    pub task_id: i64,
    pub name: String,
    /// The owning orchestration's version, carried along for workers that
    /// dispatch activity implementations by orchestration version.
    pub version: String,
    pub input: Option<serde_json::Value>,
}

/// The result of running (or failing to run) one activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActivityOutcome {
    Completed { result: Option<serde_json::Value> },
    Failed { failure: FailureDetails },
}

/// Invokes a connected worker for orchestrator turns and activity
/// invocations.
///
/// An `Err` return means the call never produced a worker decision at all —
/// transport drop, disconnect, or cancellation (§4.1 "Failure semantics") —
/// and the caller must abandon the turn. A worker-reported *business*
/// failure (the orchestrator threw, the activity raised) is not an `Err`
/// here; it's carried as data in the `Ok` response (an `OrchestratorAction::Fail`
/// or an `ActivityOutcome::Failed`).
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    async fn execute_orchestrator(&self, request: OrchestratorRequest) -> EngineResult<OrchestratorResponse>;

    async fn execute_activity(&self, request: ActivityRequest) -> EngineResult<ActivityOutcome>;
}
