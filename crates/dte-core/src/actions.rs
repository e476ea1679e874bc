// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Actions an orchestrator yields at the end of a turn.
//!
//! These are the orchestrator's side-effect requests back to the engine —
//! schedule a task, start a timer, wait on an event, finish the instance.
//! The dispatcher turns each into zero or more [`crate::history::HistoryEvent`]s
//! appended to the instance's log and/or messages placed on a queue.

use crate::execution_id::ExecutionId;
use crate::instance_id::InstanceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrchestratorAction {
    /// Schedule an activity task for out-of-process execution.
    ScheduleTask { task_id: i64, name: String, input: Option<serde_json::Value> },

    /// Start a durable timer that fires at an absolute time.
    CreateTimer { timer_id: i64, fire_at: chrono::DateTime<chrono::Utc> },

    /// Start a sub-orchestration and wait for its result.
    CallSubOrchestration {
        task_id: i64,
        name: String,
        version: String,
        instance_id: InstanceId,
        input: Option<serde_json::Value>,
    },

    /// Send an event to another instance.
    SendEvent { instance_id: InstanceId, name: String, input: Option<serde_json::Value> },

    /// Truncate history and restart the orchestrator with a new input,
    /// minting a fresh execution id.
    ContinueAsNew { new_execution_id: ExecutionId, input: Option<serde_json::Value> },

    /// Finish the instance successfully.
    Complete { result: Option<serde_json::Value> },

    /// Finish the instance with a failure.
    Fail { failure: crate::status::FailureDetails },
}

impl OrchestratorAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrchestratorAction::ScheduleTask { .. } => "schedule_task",
            OrchestratorAction::CreateTimer { .. } => "create_timer",
            OrchestratorAction::CallSubOrchestration { .. } => "call_sub_orchestration",
            OrchestratorAction::SendEvent { .. } => "send_event",
            OrchestratorAction::ContinueAsNew { .. } => "continue_as_new",
            OrchestratorAction::Complete { .. } => "complete",
            OrchestratorAction::Fail { .. } => "fail",
        }
    }

    /// Key/value pairs suitable for a tracing span, without serializing the
    /// (possibly large) input/output payloads.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            OrchestratorAction::ScheduleTask { task_id, name, .. } => {
                vec![("task_id", task_id.to_string()), ("name", name.clone())]
            }
            OrchestratorAction::CreateTimer { timer_id, fire_at } => {
                vec![("timer_id", timer_id.to_string()), ("fire_at", fire_at.to_rfc3339())]
            }
            OrchestratorAction::CallSubOrchestration { task_id, name, instance_id, .. } => {
                vec![
                    ("task_id", task_id.to_string()),
                    ("name", name.clone()),
                    ("instance_id", instance_id.to_string()),
                ]
            }
            OrchestratorAction::SendEvent { instance_id, name, .. } => {
                vec![("instance_id", instance_id.to_string()), ("name", name.clone())]
            }
            OrchestratorAction::ContinueAsNew { new_execution_id, .. } => {
                vec![("new_execution_id", new_execution_id.to_string())]
            }
            OrchestratorAction::Complete { .. } => vec![],
            OrchestratorAction::Fail { failure } => vec![("error_type", failure.error_type.clone())],
        }
    }

    /// Whether this action is one of the terminal ones that end an execution.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrchestratorAction::Complete { .. }
                | OrchestratorAction::Fail { .. }
                | OrchestratorAction::ContinueAsNew { .. }
        )
    }
}
