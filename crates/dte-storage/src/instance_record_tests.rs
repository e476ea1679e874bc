use super::*;
use dte_core::status::{OrchestrationStatus, RuntimeStatus};

fn pending_status() -> OrchestrationStatus {
    OrchestrationStatus::builder().name("demo").runtime_status(RuntimeStatus::Pending).build()
}

fn completed_status() -> OrchestrationStatus {
    OrchestrationStatus::builder().name("demo").runtime_status(RuntimeStatus::Completed).build()
}

#[test]
fn fresh_record_is_not_loaded_or_completed() {
    let record = InstanceRecord::new();
    assert!(!record.is_loaded());
    assert!(!record.is_completed());
}

#[test]
fn push_inbox_reports_whether_enqueue_is_needed() {
    let record = InstanceRecord::with_status(pending_status());
    let msg = dte_core::message::TaskMessage::new(
        dte_core::instance_id::InstanceId::new("i1"),
        dte_core::history::HistoryEvent::GenericEvent {
            event_id: dte_core::history::UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            data: serde_json::json!(null),
        },
    );
    assert!(record.push_inbox(msg));
    record.load();
    let msg2 = dte_core::message::TaskMessage::new(
        dte_core::instance_id::InstanceId::new("i1"),
        dte_core::history::HistoryEvent::GenericEvent {
            event_id: dte_core::history::UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            data: serde_json::json!(null),
        },
    );
    assert!(!record.push_inbox(msg2));
}

#[test]
fn load_drains_inbox_and_sets_loaded() {
    let record = InstanceRecord::with_status(pending_status());
    record.push_inbox(dte_core::message::TaskMessage::new(
        dte_core::instance_id::InstanceId::new("i1"),
        dte_core::history::HistoryEvent::GenericEvent {
            event_id: dte_core::history::UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            data: serde_json::json!(1),
        },
    ));
    let (history, inbox) = record.load();
    assert!(history.is_empty());
    assert_eq!(inbox.len(), 1);
    assert!(record.is_loaded());
}

#[test]
fn release_reports_whether_reenqueue_is_needed() {
    let record = InstanceRecord::with_status(pending_status());
    record.load();
    assert!(!record.release());
    record.load();
    record.push_inbox(dte_core::message::TaskMessage::new(
        dte_core::instance_id::InstanceId::new("i1"),
        dte_core::history::HistoryEvent::GenericEvent {
            event_id: dte_core::history::UNASSIGNED_EVENT_ID,
            timestamp: chrono::Utc::now(),
            data: serde_json::json!(1),
        },
    ));
    assert!(record.release());
}

#[tokio::test]
async fn wait_for_completion_returns_immediately_when_already_done() {
    let record = InstanceRecord::with_status(completed_status());
    let status = record.wait_for_completion().await;
    assert_eq!(status.runtime_status, RuntimeStatus::Completed);
}

#[tokio::test]
async fn wait_for_completion_unblocks_on_commit_turn() {
    let record = std::sync::Arc::new(InstanceRecord::with_status(pending_status()));
    let waiter = {
        let record = record.clone();
        tokio::spawn(async move { record.wait_for_completion().await })
    };
    tokio::task::yield_now().await;
    record.commit_turn(false, vec![], completed_status());
    let status = waiter.await.expect("waiter task panicked");
    assert_eq!(status.runtime_status, RuntimeStatus::Completed);
}
