// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Runtime status of an orchestration instance.

use crate::execution_id::ExecutionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The runtime status of an orchestration instance (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Terminated,
    Canceled,
    ContinuedAsNew,
    Suspended,
}

crate::simple_display! {
    RuntimeStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Terminated => "terminated",
        Canceled => "canceled",
        ContinuedAsNew => "continued_as_new",
        Suspended => "suspended",
    }
}

impl RuntimeStatus {
    /// Terminal statuses are the ones `IsCompleted` derives from (§3).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RuntimeStatus::Completed
                | RuntimeStatus::Failed
                | RuntimeStatus::Terminated
                | RuntimeStatus::Canceled
        )
    }
}

/// Structured failure information attached to a failed task or instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetails {
    pub error_type: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<FailureDetails>>,
}

impl FailureDetails {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error_type: error_type.into(), message: message.into(), stack_trace: None, inner: None }
    }
}

/// The durable status record for one instance (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationStatus {
    pub name: String,
    pub version: String,
    pub execution_id: ExecutionId,
    pub runtime_status: RuntimeStatus,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<FailureDetails>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

crate::builder! {
    pub struct OrchestrationStatusBuilder => OrchestrationStatus {
        into {
            name: String = "test-orchestrator",
            version: String = "",
        }
        set {
            execution_id: ExecutionId = ExecutionId::new(),
            runtime_status: RuntimeStatus = RuntimeStatus::Pending,
            tags: HashMap<String, String> = HashMap::new(),
        }
        option {
            input: serde_json::Value = None,
            output: serde_json::Value = None,
            custom_status: serde_json::Value = None,
            failure_details: FailureDetails = None,
        }
        computed {
            created_at: DateTime<Utc> = Utc::now(),
            last_updated_at: DateTime<Utc> = Utc::now(),
        }
    }
}
