// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

use super::*;
use dte_core::clock::FakeClock;
use dte_core::status::{FailureDetails, RuntimeStatus};

fn running(execution_id: ExecutionId) -> OrchestrationStatus {
    OrchestrationStatus::builder()
        .name("demo")
        .execution_id(execution_id)
        .runtime_status(RuntimeStatus::Running)
        .build()
}

#[test]
fn message_events_are_appended_in_fifo_order_before_action_events() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let status = running(ExecutionId::new());
    let messages = vec![
        TaskMessage::new(id.clone(), HistoryEvent::TaskCompleted { event_id: UNASSIGNED_EVENT_ID, timestamp: clock.now(), task_id: 1, result: None }),
        TaskMessage::new(id.clone(), HistoryEvent::TaskCompleted { event_id: UNASSIGNED_EVENT_ID, timestamp: clock.now(), task_id: 2, result: None }),
    ];
    let response = OrchestratorResponse { actions: vec![], custom_status: None };

    let result = plan_normal_turn(&id, status, 3, messages, response, None, &clock);

    assert_eq!(result.new_history_events.len(), 2);
    assert_eq!(result.new_history_events[0].event_id(), 3);
    assert_eq!(result.new_history_events[1].event_id(), 4);
    match &result.new_history_events[0] {
        HistoryEvent::TaskCompleted { task_id, .. } => assert_eq!(*task_id, 1),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn schedule_task_action_produces_history_event_and_activity_message() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let status = running(ExecutionId::new());
    let response = OrchestratorResponse {
        actions: vec![OrchestratorAction::ScheduleTask { task_id: 7, name: "do_thing".into(), input: None }],
        custom_status: None,
    };

    let result = plan_normal_turn(&id, status, 0, vec![], response, None, &clock);

    assert_eq!(result.new_history_events.len(), 1);
    assert_eq!(result.outbound_activity_messages.len(), 1);
    assert_eq!(result.outbound_activity_messages[0].instance, id);
    match &result.outbound_activity_messages[0].event {
        HistoryEvent::TaskScheduled { task_id, name, .. } => {
            assert_eq!(*task_id, 7);
            assert_eq!(name, "do_thing");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn create_timer_produces_a_timer_message_stamped_with_fire_at() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let status = running(ExecutionId::new());
    let fire_at = clock.now() + chrono::Duration::minutes(5);
    let response = OrchestratorResponse {
        actions: vec![OrchestratorAction::CreateTimer { timer_id: 1, fire_at }],
        custom_status: None,
    };

    let result = plan_normal_turn(&id, status, 0, vec![], response, None, &clock);

    assert_eq!(result.timer_messages.len(), 1);
    match &result.timer_messages[0].event {
        HistoryEvent::TimerFired { timer_id, fire_at: f, .. } => {
            assert_eq!(*timer_id, 1);
            assert_eq!(*f, fire_at);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn complete_action_marks_status_completed_and_sets_output() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let status = running(ExecutionId::new());
    let response = OrchestratorResponse {
        actions: vec![OrchestratorAction::Complete { result: Some(serde_json::json!(42)) }],
        custom_status: None,
    };

    let result = plan_normal_turn(&id, status, 0, vec![], response, None, &clock);

    let status = result.status.unwrap();
    assert_eq!(status.runtime_status, RuntimeStatus::Completed);
    assert_eq!(status.output, Some(serde_json::json!(42)));
    assert!(result.outbound_orchestrator_messages.is_empty());
}

#[test]
fn complete_with_parent_notifies_the_parent_instance() {
    let clock = FakeClock::new();
    let id = InstanceId::new("child");
    let status = running(ExecutionId::new());
    let response = OrchestratorResponse {
        actions: vec![OrchestratorAction::Complete { result: Some(serde_json::json!("done")) }],
        custom_status: None,
    };

    let result =
        plan_normal_turn(&id, status, 0, vec![], response, Some((InstanceId::new("parent"), 9)), &clock);

    assert_eq!(result.outbound_orchestrator_messages.len(), 1);
    let msg = &result.outbound_orchestrator_messages[0];
    assert_eq!(msg.instance, InstanceId::new("parent"));
    match &msg.event {
        HistoryEvent::SubOrchestrationInstanceCompleted { task_id, result, .. } => {
            assert_eq!(*task_id, 9);
            assert_eq!(result, &Some(serde_json::json!("done")));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn fail_with_parent_notifies_the_parent_instance() {
    let clock = FakeClock::new();
    let id = InstanceId::new("child");
    let status = running(ExecutionId::new());
    let failure = FailureDetails::new("Boom", "kaboom");
    let response = OrchestratorResponse {
        actions: vec![OrchestratorAction::Fail { failure: failure.clone() }],
        custom_status: None,
    };

    let result =
        plan_normal_turn(&id, status, 0, vec![], response, Some((InstanceId::new("parent"), 3)), &clock);

    assert_eq!(result.status.unwrap().runtime_status, RuntimeStatus::Failed);
    match &result.outbound_orchestrator_messages[0].event {
        HistoryEvent::SubOrchestrationInstanceFailed { task_id, failure: f, .. } => {
            assert_eq!(*task_id, 3);
            assert_eq!(f.error_type, failure.error_type);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn continue_as_new_swaps_execution_id_and_discards_prior_turn_side_effects() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let old_execution_id = ExecutionId::new();
    let new_execution_id = ExecutionId::new();
    let status = running(old_execution_id.clone());
    let messages =
        vec![TaskMessage::new(id.clone(), HistoryEvent::TaskCompleted { event_id: UNASSIGNED_EVENT_ID, timestamp: clock.now(), task_id: 1, result: None })];
    let response = OrchestratorResponse {
        actions: vec![
            OrchestratorAction::ScheduleTask { task_id: 99, name: "should_be_dropped".into(), input: None },
            OrchestratorAction::ContinueAsNew { new_execution_id: new_execution_id.clone(), input: Some(serde_json::json!(1)) },
        ],
        custom_status: None,
    };

    let result = plan_normal_turn(&id, status, 5, messages, response, None, &clock);

    let status = result.status.unwrap();
    assert_eq!(status.execution_id, new_execution_id);
    assert_ne!(status.execution_id, old_execution_id);
    assert_eq!(status.runtime_status, RuntimeStatus::Running);
    assert_eq!(status.input, Some(serde_json::json!(1)));
    assert!(result.outbound_activity_messages.is_empty(), "action scheduled before ContinueAsNew must be dropped");
    assert_eq!(result.new_history_events.len(), 2);
    match &result.new_history_events[0] {
        HistoryEvent::ExecutionStarted { execution_id, .. } => assert_eq!(*execution_id, new_execution_id),
        other => panic!("expected ExecutionStarted for the new generation, got {other:?}"),
    }
    assert!(matches!(result.new_history_events[1], HistoryEvent::ContinueAsNew { .. }));
}

#[test]
fn detect_control_prefers_terminate_over_other_messages_in_the_batch() {
    let clock = FakeClock::new();
    let id = InstanceId::new("i1");
    let messages = vec![
        TaskMessage::new(id.clone(), HistoryEvent::ExecutionSuspended { event_id: UNASSIGNED_EVENT_ID, timestamp: clock.now(), reason: None }),
        TaskMessage::new(id, HistoryEvent::ExecutionTerminated { event_id: UNASSIGNED_EVENT_ID, timestamp: clock.now(), reason: Some(serde_json::json!("stop")) }),
    ];

    let (signal, _) = detect_control(&messages).expect("control message found");
    assert!(matches!(signal, ControlSignal::Terminate));
}

#[test]
fn plan_control_turn_terminate_sets_status_and_output() {
    let clock = FakeClock::new();
    let status = running(ExecutionId::new());
    let event = HistoryEvent::ExecutionTerminated {
        event_id: UNASSIGNED_EVENT_ID,
        timestamp: clock.now(),
        reason: Some(serde_json::json!("operator request")),
    };

    let result = plan_control_turn(4, status, ControlSignal::Terminate, &event, &clock);

    let status = result.status.unwrap();
    assert_eq!(status.runtime_status, RuntimeStatus::Terminated);
    assert_eq!(status.output, Some(serde_json::json!("operator request")));
    assert_eq!(result.new_history_events[0].event_id(), 4);
}

#[test]
fn find_parent_checks_history_then_the_incoming_batch() {
    let clock = FakeClock::new();
    let parent = InstanceId::new("parent");
    let started_in_history = HistoryEvent::ExecutionStarted {
        event_id: 0,
        timestamp: clock.now(),
        execution_id: ExecutionId::new(),
        name: "child".into(),
        version: String::new(),
        input: None,
        parent_instance: Some(parent.clone()),
        parent_task_id: Some(2),
        scheduled_start_time: None,
        tags: Default::default(),
    };
    assert_eq!(find_parent(&[started_in_history], &[]), Some((parent.clone(), 2)));

    let msg = TaskMessage::new(
        InstanceId::new("child2"),
        HistoryEvent::ExecutionStarted {
            event_id: UNASSIGNED_EVENT_ID,
            timestamp: clock.now(),
            execution_id: ExecutionId::new(),
            name: "child2".into(),
            version: String::new(),
            input: None,
            parent_instance: Some(parent.clone()),
            parent_task_id: Some(5),
            scheduled_start_time: None,
            tags: Default::default(),
        },
    );
    assert_eq!(find_parent(&[], &[msg]), Some((parent, 5)));
    assert_eq!(find_parent(&[], &[]), None);
}
