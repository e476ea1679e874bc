// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The append-only history log an orchestration replays against.

use crate::execution_id::ExecutionId;
use crate::status::FailureDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel `event_id` for events that haven't been assigned a position in
/// the log yet (orchestrator-emitted events before they're appended).
pub const UNASSIGNED_EVENT_ID: i64 = -1;

/// One entry in an instance's history log.
///
/// Every variant carries `event_id` (the position at which it was appended,
/// or [`UNASSIGNED_EVENT_ID`] before append) and `timestamp`. Replay walks
/// these in order to rebuild an orchestrator's in-memory state without
/// re-running side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum HistoryEvent {
    ExecutionStarted {
        event_id: i64,
        timestamp: DateTime<Utc>,
        execution_id: ExecutionId,
        name: String,
        version: String,
        input: Option<serde_json::Value>,
        parent_instance: Option<crate::instance_id::InstanceId>,
        /// The parent's `TaskScheduled`/`SubOrchestrationInstanceCreated`
        /// correlator, so the child's completion can be routed back to the
        /// right pending task on the parent. `None` for top-level instances.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_task_id: Option<i64>,
        /// Defers delivery of this message until the given instant (§4.1
        /// step 3). `None` means "start immediately".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scheduled_start_time: Option<DateTime<Utc>>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    ExecutionCompleted {
        event_id: i64,
        timestamp: DateTime<Utc>,
        result: Option<serde_json::Value>,
    },
    ExecutionFailed {
        event_id: i64,
        timestamp: DateTime<Utc>,
        failure: FailureDetails,
    },
    ExecutionTerminated {
        event_id: i64,
        timestamp: DateTime<Utc>,
        reason: Option<serde_json::Value>,
    },
    ExecutionSuspended {
        event_id: i64,
        timestamp: DateTime<Utc>,
        reason: Option<String>,
    },
    ExecutionResumed {
        event_id: i64,
        timestamp: DateTime<Utc>,
        reason: Option<String>,
    },
    ContinueAsNew {
        event_id: i64,
        timestamp: DateTime<Utc>,
        input: Option<serde_json::Value>,
    },
    TaskScheduled {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        name: String,
        input: Option<serde_json::Value>,
    },
    TaskCompleted {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        result: Option<serde_json::Value>,
    },
    TaskFailed {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        failure: FailureDetails,
    },
    SubOrchestrationInstanceCreated {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        name: String,
        version: String,
        instance_id: crate::instance_id::InstanceId,
        input: Option<serde_json::Value>,
    },
    SubOrchestrationInstanceCompleted {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        result: Option<serde_json::Value>,
    },
    SubOrchestrationInstanceFailed {
        event_id: i64,
        timestamp: DateTime<Utc>,
        task_id: i64,
        failure: FailureDetails,
    },
    TimerCreated {
        event_id: i64,
        timestamp: DateTime<Utc>,
        timer_id: i64,
        fire_at: DateTime<Utc>,
    },
    TimerFired {
        event_id: i64,
        timestamp: DateTime<Utc>,
        timer_id: i64,
        fire_at: DateTime<Utc>,
    },
    EventRaised {
        event_id: i64,
        timestamp: DateTime<Utc>,
        name: String,
        input: Option<serde_json::Value>,
    },
    EventSent {
        event_id: i64,
        timestamp: DateTime<Utc>,
        instance_id: crate::instance_id::InstanceId,
        name: String,
        input: Option<serde_json::Value>,
    },
    GenericEvent {
        event_id: i64,
        timestamp: DateTime<Utc>,
        data: serde_json::Value,
    },
}

impl HistoryEvent {
    pub fn event_id(&self) -> i64 {
        match self {
            HistoryEvent::ExecutionStarted { event_id, .. }
            | HistoryEvent::ExecutionCompleted { event_id, .. }
            | HistoryEvent::ExecutionFailed { event_id, .. }
            | HistoryEvent::ExecutionTerminated { event_id, .. }
            | HistoryEvent::ExecutionSuspended { event_id, .. }
            | HistoryEvent::ExecutionResumed { event_id, .. }
            | HistoryEvent::ContinueAsNew { event_id, .. }
            | HistoryEvent::TaskScheduled { event_id, .. }
            | HistoryEvent::TaskCompleted { event_id, .. }
            | HistoryEvent::TaskFailed { event_id, .. }
            | HistoryEvent::SubOrchestrationInstanceCreated { event_id, .. }
            | HistoryEvent::SubOrchestrationInstanceCompleted { event_id, .. }
            | HistoryEvent::SubOrchestrationInstanceFailed { event_id, .. }
            | HistoryEvent::TimerCreated { event_id, .. }
            | HistoryEvent::TimerFired { event_id, .. }
            | HistoryEvent::EventRaised { event_id, .. }
            | HistoryEvent::EventSent { event_id, .. }
            | HistoryEvent::GenericEvent { event_id, .. } => *event_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryEvent::ExecutionStarted { timestamp, .. }
            | HistoryEvent::ExecutionCompleted { timestamp, .. }
            | HistoryEvent::ExecutionFailed { timestamp, .. }
            | HistoryEvent::ExecutionTerminated { timestamp, .. }
            | HistoryEvent::ExecutionSuspended { timestamp, .. }
            | HistoryEvent::ExecutionResumed { timestamp, .. }
            | HistoryEvent::ContinueAsNew { timestamp, .. }
            | HistoryEvent::TaskScheduled { timestamp, .. }
            | HistoryEvent::TaskCompleted { timestamp, .. }
            | HistoryEvent::TaskFailed { timestamp, .. }
            | HistoryEvent::SubOrchestrationInstanceCreated { timestamp, .. }
            | HistoryEvent::SubOrchestrationInstanceCompleted { timestamp, .. }
            | HistoryEvent::SubOrchestrationInstanceFailed { timestamp, .. }
            | HistoryEvent::TimerCreated { timestamp, .. }
            | HistoryEvent::TimerFired { timestamp, .. }
            | HistoryEvent::EventRaised { timestamp, .. }
            | HistoryEvent::EventSent { timestamp, .. }
            | HistoryEvent::GenericEvent { timestamp, .. } => *timestamp,
        }
    }

    /// Stamp an event that was built with [`UNASSIGNED_EVENT_ID`] with its
    /// final position in the log.
    pub fn assign_event_id(&mut self, id: i64) {
        macro_rules! set {
            ($($variant:ident),+ $(,)?) => {
                match self {
                    $( HistoryEvent::$variant { event_id, .. } => *event_id = id, )+
                }
            };
        }
        set!(
            ExecutionStarted,
            ExecutionCompleted,
            ExecutionFailed,
            ExecutionTerminated,
            ExecutionSuspended,
            ExecutionResumed,
            ContinueAsNew,
            TaskScheduled,
            TaskCompleted,
            TaskFailed,
            SubOrchestrationInstanceCreated,
            SubOrchestrationInstanceCompleted,
            SubOrchestrationInstanceFailed,
            TimerCreated,
            TimerFired,
            EventRaised,
            EventSent,
            GenericEvent,
        );
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
