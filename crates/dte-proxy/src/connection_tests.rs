use super::*;
use std::time::Duration;

fn manager(grace: Duration) -> Arc<ConnectionManager> {
    let signal = Arc::new(TrafficSignal::new());
    Arc::new(ConnectionManager::new(signal, ConnectionConfig { reconnect_grace: grace, outbound_buffer: 8 }))
}

#[tokio::test]
async fn attach_sets_traffic_signal() {
    let mgr = manager(Duration::from_millis(50));
    assert!(!mgr.is_attached());
    let handle = mgr.attach().await.expect("attach");
    assert!(mgr.is_attached());
    drop(handle);
    assert!(!mgr.is_attached());
}

#[tokio::test]
async fn second_attach_fails_after_grace_window() {
    let mgr = manager(Duration::from_millis(30));
    let _first = mgr.attach().await.expect("first attach");
    let err = mgr.attach().await.unwrap_err();
    assert!(matches!(err, ProxyError::AlreadyConnected));
}

#[tokio::test]
async fn second_attach_succeeds_if_first_detaches_within_grace() {
    let mgr = manager(Duration::from_millis(200));
    let first = mgr.attach().await.expect("first attach");

    let mgr2 = Arc::clone(&mgr);
    let waiter = tokio::spawn(async move { mgr2.attach().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    drop(first);

    let second = waiter.await.expect("join").expect("second attach should succeed");
    assert!(mgr.is_attached());
    drop(second);
}

#[tokio::test]
async fn send_without_attachment_fails() {
    let mgr = manager(Duration::from_millis(10));
    let item = WorkItem::Activity(dte_engine::executor::ActivityRequest {
        instance: dte_core::instance_id::InstanceId::new("i1"),
        execution_id: dte_core::execution_id::ExecutionId::new(),
        task_id: 1,
        name: "echo".into(),
        version: "".into(),
        input: None,
    });
    let err = mgr.send(item).await.unwrap_err();
    assert!(matches!(err, ProxyError::NotConnected));
}

#[tokio::test]
async fn send_delivers_to_attached_receiver() {
    let mgr = manager(Duration::from_millis(10));
    let mut handle = mgr.attach().await.expect("attach");
    let item = WorkItem::Activity(dte_engine::executor::ActivityRequest {
        instance: dte_core::instance_id::InstanceId::new("i1"),
        execution_id: dte_core::execution_id::ExecutionId::new(),
        task_id: 7,
        name: "echo".into(),
        version: "".into(),
        input: None,
    });
    mgr.send(item).await.expect("send");
    let received = handle.recv().await.expect("recv");
    match received {
        WorkItem::Activity(req) => assert_eq!(req.task_id, 7),
        _ => panic!("expected activity work item"),
    }
}

#[tokio::test]
async fn explicit_detach_releases_slot_immediately() {
    let mgr = manager(Duration::from_millis(10));
    let handle = mgr.attach().await.expect("attach");
    handle.detach();
    assert!(!mgr.is_attached());
}
