use super::*;

#[tokio::test]
async fn push_then_pop_round_trips() {
    let queue = ReadyQueue::new();
    queue.push(InstanceId::new("i1"));
    let popped = queue.pop().await;
    assert_eq!(popped, InstanceId::new("i1"));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn duplicate_push_is_a_no_op() {
    let queue = ReadyQueue::new();
    queue.push(InstanceId::new("i1"));
    queue.push(InstanceId::new("I1"));
    assert_eq!(queue.len(), 1);
    let popped = queue.pop().await;
    assert_eq!(popped, InstanceId::new("i1"));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn pop_order_is_fifo() {
    let queue = ReadyQueue::new();
    queue.push(InstanceId::new("i1"));
    queue.push(InstanceId::new("i2"));
    assert_eq!(queue.pop().await, InstanceId::new("i1"));
    assert_eq!(queue.pop().await, InstanceId::new("i2"));
}

#[tokio::test]
async fn id_can_be_repushed_after_pop() {
    let queue = ReadyQueue::new();
    queue.push(InstanceId::new("i1"));
    queue.pop().await;
    queue.push(InstanceId::new("i1"));
    assert_eq!(queue.len(), 1);
}
