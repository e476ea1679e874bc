// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Pure functions turning a turn's inputs (drained messages, a worker's
//! decisions) into the `TurnResult` the instance store commits (§4.4 step 4).
//!
//! Kept free of any store/executor access so the translation rules — the
//! part of this engine most worth testing exhaustively — can be exercised
//! without spinning up dispatchers or a fake worker.

use crate::executor::OrchestratorResponse;
use dte_core::actions::OrchestratorAction;
use dte_core::clock::Clock;
use dte_core::execution_id::ExecutionId;
use dte_core::history::{HistoryEvent, UNASSIGNED_EVENT_ID};
use dte_core::instance_id::InstanceId;
use dte_core::message::TaskMessage;
use dte_core::status::{OrchestrationStatus, RuntimeStatus};
use dte_storage::instance_store::TurnResult;

/// A control-plane signal that bypasses the remote worker entirely — the
/// worker never authored these, the client did, and acting on them can't
/// wait for a worker round trip (§6, §7 kind 1/4).
pub enum ControlSignal {
    Terminate,
    Suspend,
    Resume,
}

/// Scan a drained batch for a control message. Terminate wins over
/// everything else in the same batch (§8 scenario 4: "no new history events
/// accepted" once terminated); Resume is checked before Suspend so a
/// Resume+Suspend pair in one batch lands on the more specific transition.
///
/// When a control message is found, every other message in the batch is
/// intentionally dropped rather than replayed through the worker — control
/// messages are engine-authoritative, and the orchestrator code was never
/// going to observe them anyway (see `DESIGN.md`).
pub fn detect_control(messages: &[TaskMessage]) -> Option<(ControlSignal, &HistoryEvent)> {
    if let Some(m) = messages.iter().find(|m| matches!(m.event, HistoryEvent::ExecutionTerminated { .. })) {
        return Some((ControlSignal::Terminate, &m.event));
    }
    if let Some(m) = messages.iter().find(|m| matches!(m.event, HistoryEvent::ExecutionResumed { .. })) {
        return Some((ControlSignal::Resume, &m.event));
    }
    if let Some(m) = messages.iter().find(|m| matches!(m.event, HistoryEvent::ExecutionSuspended { .. })) {
        return Some((ControlSignal::Suspend, &m.event));
    }
    None
}

/// Build the turn result for a control message, without invoking the worker.
pub fn plan_control_turn(
    history_len: usize,
    mut status: OrchestrationStatus,
    signal: ControlSignal,
    event: &HistoryEvent,
    clock: &impl Clock,
) -> TurnResult {
    let mut event = event.clone();
    event.assign_event_id(history_len as i64);

    match signal {
        ControlSignal::Terminate => {
            status.runtime_status = RuntimeStatus::Terminated;
            if let HistoryEvent::ExecutionTerminated { reason, .. } = &event {
                status.output = reason.clone();
            }
        }
        ControlSignal::Suspend => status.runtime_status = RuntimeStatus::Suspended,
        ControlSignal::Resume => status.runtime_status = RuntimeStatus::Running,
    }
    status.last_updated_at = clock.now();

    TurnResult { new_history_events: vec![event], status: Some(status), ..Default::default() }
}

/// Find the `(parent_instance, parent_task_id)` this execution was started
/// with, if any — first checked in already-committed `history`, then in the
/// batch being delivered this turn (the first turn of a sub-orchestration
/// sees its own `ExecutionStarted` only there, not in `history` yet).
///
/// A continue-as-new generation that doesn't carry its own fresh
/// `ExecutionStarted` loses this linkage once the old history is truncated —
/// a known simplification, see `DESIGN.md`.
pub fn find_parent(history: &[HistoryEvent], messages: &[TaskMessage]) -> Option<(InstanceId, i64)> {
    let from_event = |ev: &HistoryEvent| match ev {
        HistoryEvent::ExecutionStarted { parent_instance: Some(p), parent_task_id: Some(t), .. } => {
            Some((p.clone(), *t))
        }
        _ => None,
    };
    history.iter().find_map(from_event).or_else(|| messages.iter().map(|m| &m.event).find_map(from_event))
}

/// Build the turn result for a worker's orchestrator decisions (§4.4 step 4).
#[allow(clippy::too_many_arguments)]
pub fn plan_normal_turn(
    id: &InstanceId,
    mut status: OrchestrationStatus,
    history_len: usize,
    messages: Vec<TaskMessage>,
    response: OrchestratorResponse,
    parent: Option<(InstanceId, i64)>,
    clock: &impl Clock,
) -> TurnResult {
    let mut next_id = history_len as i64;
    let mut appended = Vec::with_capacity(messages.len() + response.actions.len());

    // Message-derived events land first, in inbox FIFO order (§5).
    for msg in messages {
        let mut event = msg.event;
        event.assign_event_id(next_id);
        next_id += 1;
        appended.push(event);
    }

    let mut outbound_orchestrator_messages = Vec::new();
    let mut timer_messages = Vec::new();
    let mut outbound_activity_messages = Vec::new();

    for action in response.actions {
        let now = clock.now();
        match action {
            OrchestratorAction::ScheduleTask { task_id, name, input } => {
                let event =
                    HistoryEvent::TaskScheduled { event_id: next_id, timestamp: now, task_id, name, input };
                next_id += 1;
                appended.push(event.clone());
                outbound_activity_messages.push(TaskMessage::new(id.clone(), event));
            }
            OrchestratorAction::CreateTimer { timer_id, fire_at } => {
                let created = HistoryEvent::TimerCreated { event_id: next_id, timestamp: now, timer_id, fire_at };
                next_id += 1;
                appended.push(created);
                let fired = HistoryEvent::TimerFired {
                    event_id: UNASSIGNED_EVENT_ID,
                    timestamp: fire_at,
                    timer_id,
                    fire_at,
                };
                timer_messages.push(TaskMessage::new(id.clone(), fired));
            }
            OrchestratorAction::CallSubOrchestration { task_id, name, version, instance_id, input } => {
                let event = HistoryEvent::SubOrchestrationInstanceCreated {
                    event_id: next_id,
                    timestamp: now,
                    task_id,
                    name: name.clone(),
                    version: version.clone(),
                    instance_id: instance_id.clone(),
                    input: input.clone(),
                };
                next_id += 1;
                appended.push(event);
                let started = HistoryEvent::ExecutionStarted {
                    event_id: UNASSIGNED_EVENT_ID,
                    timestamp: now,
                    execution_id: ExecutionId::new(),
                    name,
                    version,
                    input,
                    parent_instance: Some(id.clone()),
                    parent_task_id: Some(task_id),
                    scheduled_start_time: None,
                    tags: Default::default(),
                };
                outbound_orchestrator_messages.push(TaskMessage::new(instance_id, started));
            }
            OrchestratorAction::SendEvent { instance_id, name, input } => {
                let sent = HistoryEvent::EventSent {
                    event_id: next_id,
                    timestamp: now,
                    instance_id: instance_id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                };
                next_id += 1;
                appended.push(sent);
                let raised = HistoryEvent::EventRaised { event_id: UNASSIGNED_EVENT_ID, timestamp: now, name, input };
                outbound_orchestrator_messages.push(TaskMessage::new(instance_id, raised));
            }
            OrchestratorAction::ContinueAsNew { new_execution_id, input } => {
                // The store detects the execution-id change below and
                // truncates history to exactly what we return here; anything
                // accumulated above for *this* generation must not survive
                // into the new one, and any pending side-effect messages
                // from actions ahead of this one in the same batch are
                // discarded rather than delivered against a generation that
                // is about to disappear. The truncated history must still
                // open with an `ExecutionStarted` for the new generation
                // (§3, §8 scenario 5), so one is synthesized here rather
                // than left to whatever produced the prior generation's.
                appended.clear();
                outbound_orchestrator_messages.clear();
                timer_messages.clear();
                outbound_activity_messages.clear();

                let started = HistoryEvent::ExecutionStarted {
                    event_id: 0,
                    timestamp: now,
                    execution_id: new_execution_id.clone(),
                    name: status.name.clone(),
                    version: status.version.clone(),
                    input: input.clone(),
                    parent_instance: parent.as_ref().map(|(p, _)| p.clone()),
                    parent_task_id: parent.as_ref().map(|(_, t)| *t),
                    scheduled_start_time: None,
                    tags: status.tags.clone(),
                };
                appended.push(started);
                appended.push(HistoryEvent::ContinueAsNew { event_id: 1, timestamp: now, input: input.clone() });

                status.execution_id = new_execution_id;
                status.runtime_status = RuntimeStatus::Running;
                status.input = input;
                status.output = None;
                status.failure_details = None;
                status.last_updated_at = now;

                return TurnResult {
                    new_history_events: appended,
                    status: Some(status),
                    outbound_orchestrator_messages,
                    timer_messages,
                    outbound_activity_messages,
                };
            }
            OrchestratorAction::Complete { result } => {
                let event = HistoryEvent::ExecutionCompleted { event_id: next_id, timestamp: now, result: result.clone() };
                next_id += 1;
                appended.push(event);
                status.runtime_status = RuntimeStatus::Completed;
                status.output = result.clone();
                if let Some((parent_instance, parent_task_id)) = &parent {
                    outbound_orchestrator_messages.push(TaskMessage::new(
                        parent_instance.clone(),
                        HistoryEvent::SubOrchestrationInstanceCompleted {
                            event_id: UNASSIGNED_EVENT_ID,
                            timestamp: now,
                            task_id: *parent_task_id,
                            result,
                        },
                    ));
                }
                break;
            }
            OrchestratorAction::Fail { failure } => {
                let event =
                    HistoryEvent::ExecutionFailed { event_id: next_id, timestamp: now, failure: failure.clone() };
                next_id += 1;
                appended.push(event);
                status.runtime_status = RuntimeStatus::Failed;
                status.failure_details = Some(failure.clone());
                if let Some((parent_instance, parent_task_id)) = &parent {
                    outbound_orchestrator_messages.push(TaskMessage::new(
                        parent_instance.clone(),
                        HistoryEvent::SubOrchestrationInstanceFailed {
                            event_id: UNASSIGNED_EVENT_ID,
                            timestamp: now,
                            task_id: *parent_task_id,
                            failure,
                        },
                    ));
                }
                break;
            }
        }
    }

    if response.custom_status.is_some() {
        status.custom_status = response.custom_status;
    }
    if !matches!(status.runtime_status, RuntimeStatus::Completed | RuntimeStatus::Failed) {
        status.runtime_status = RuntimeStatus::Running;
    }
    status.last_updated_at = clock.now();

    TurnResult {
        new_history_events: appended,
        status: Some(status),
        outbound_orchestrator_messages,
        timer_messages,
        outbound_activity_messages,
    }
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
