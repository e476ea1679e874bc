use super::*;
use dte_core::history::UNASSIGNED_EVENT_ID;
use dte_core::instance_id::InstanceId;
use std::time::Duration as StdDuration;

fn timer_event(fire_at: DateTime<Utc>) -> HistoryEvent {
    HistoryEvent::TimerFired { event_id: UNASSIGNED_EVENT_ID, timestamp: Utc::now(), timer_id: 1, fire_at }
}

fn scheduled_start_event(scheduled_start_time: Option<DateTime<Utc>>) -> HistoryEvent {
    HistoryEvent::ExecutionStarted {
        event_id: UNASSIGNED_EVENT_ID,
        timestamp: Utc::now(),
        execution_id: dte_core::execution_id::ExecutionId::new(),
        name: "demo".into(),
        version: String::new(),
        input: None,
        parent_instance: None,
        parent_task_id: None,
        scheduled_start_time,
        tags: Default::default(),
    }
}

#[test]
fn scheduled_delay_is_none_for_non_timer_events() {
    let event = HistoryEvent::GenericEvent {
        event_id: UNASSIGNED_EVENT_ID,
        timestamp: Utc::now(),
        data: serde_json::json!(null),
    };
    assert!(scheduled_delay(&event, Utc::now()).is_none());
}

#[test]
fn scheduled_delay_computes_remaining_time() {
    let now = Utc::now();
    let event = timer_event(now + chrono::Duration::milliseconds(250));
    let delay = scheduled_delay(&event, now).expect("future fire time yields a delay");
    assert!(delay >= StdDuration::from_millis(240) && delay <= StdDuration::from_millis(260));
}

#[test]
fn scheduled_delay_is_none_once_past() {
    let now = Utc::now();
    let event = timer_event(now - chrono::Duration::seconds(1));
    assert!(scheduled_delay(&event, now).is_none());
}

#[test]
fn scheduled_delay_honors_execution_started_scheduled_start_time() {
    let now = Utc::now();
    let event = scheduled_start_event(Some(now + chrono::Duration::milliseconds(250)));
    let delay = scheduled_delay(&event, now).expect("scheduled start yields a delay");
    assert!(delay >= StdDuration::from_millis(240) && delay <= StdDuration::from_millis(260));
}

#[test]
fn scheduled_delay_is_none_for_immediate_execution_started() {
    let event = scheduled_start_event(None);
    assert!(scheduled_delay(&event, Utc::now()).is_none());
}

#[tokio::test]
async fn next_released_returns_none_when_empty() {
    let queue = DelayedQueue::new();
    assert!(queue.next_released().await.is_none());
}

#[tokio::test]
async fn next_released_waits_out_the_delay() {
    let queue = DelayedQueue::new();
    let msg = TaskMessage::new(InstanceId::new("i1"), timer_event(Utc::now()));
    queue.schedule(msg, StdDuration::from_millis(20)).await;
    let start = std::time::Instant::now();
    let released = queue.next_released().await;
    assert!(released.is_some());
    assert!(start.elapsed() >= StdDuration::from_millis(15));
}
