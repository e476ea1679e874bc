// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The activity dispatcher: drains [`dte_storage::ActivityQueue`] and hands
//! each scheduled task to the worker (§4.5).

use crate::config::DispatcherConfig;
use crate::executor::{ActivityOutcome, ActivityRequest, Executor};
use crate::traffic_signal::TrafficSignal;
use dte_core::clock::Clock;
use dte_core::history::{HistoryEvent, UNASSIGNED_EVENT_ID};
use dte_core::message::TaskMessage;
use dte_storage::instance_store::InstanceStore;
use dte_storage::ActivityQueue;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct ActivityDispatcher<S, E, C> {
    store: Arc<S>,
    queue: Arc<ActivityQueue>,
    executor: Arc<E>,
    signal: Arc<TrafficSignal>,
    config: DispatcherConfig,
    clock: C,
}

impl<S, E, C> ActivityDispatcher<S, E, C>
where
    S: InstanceStore,
    E: Executor,
    C: Clock,
{
    pub fn new(
        store: Arc<S>,
        queue: Arc<ActivityQueue>,
        executor: Arc<E>,
        signal: Arc<TrafficSignal>,
        config: DispatcherConfig,
        clock: C,
    ) -> Self {
        Self { store, queue, executor, signal, config, clock }
    }

    /// Spawn `max_concurrent_activity_turns` copies of [`Self::run`].
    pub fn spawn(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        (0..self.config.max_concurrent_activity_turns)
            .map(|_| {
                let dispatcher = Arc::clone(&self);
                let shutdown = shutdown.clone();
                tokio::spawn(async move { dispatcher.run(shutdown).await })
            })
            .collect()
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = self.signal.wait() => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    continue;
                }
            }

            let msg = tokio::select! {
                next = self.queue.dequeue() => next,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    continue;
                }
            };

            self.run_one(msg).await;
        }
    }

    async fn run_one(&self, msg: TaskMessage) {
        let HistoryEvent::TaskScheduled { task_id, name, input, .. } = msg.event.clone() else {
            tracing::error!(instance_id = %msg.instance, "activity queue produced a non-TaskScheduled message; dropping");
            return;
        };

        let Some(status) = self.store.try_get_status(&msg.instance).await else {
            tracing::debug!(instance_id = %msg.instance, task_id, "activity target instance no longer exists; dropping");
            return;
        };
        if status.runtime_status.is_terminal() {
            tracing::debug!(instance_id = %msg.instance, task_id, "activity target instance already finished; dropping");
            return;
        }

        let request = ActivityRequest {
            instance: msg.instance.clone(),
            execution_id: status.execution_id.clone(),
            task_id,
            name,
            version: status.version.clone(),
            input,
        };

        let start = std::time::Instant::now();
        let outcome =
            tokio::time::timeout(self.config.max_turn_duration(), self.executor.execute_activity(request)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(ActivityOutcome::Completed { result })) => {
                tracing::debug!(instance_id = %msg.instance, task_id, elapsed_ms, "activity completed");
                let event = HistoryEvent::TaskCompleted {
                    event_id: UNASSIGNED_EVENT_ID,
                    timestamp: self.clock.now(),
                    task_id,
                    result,
                };
                self.store.add_message(TaskMessage::new(msg.instance, event)).await;
            }
            Ok(Ok(ActivityOutcome::Failed { failure })) => {
                tracing::debug!(instance_id = %msg.instance, task_id, elapsed_ms, error_type = %failure.error_type, "activity reported failure");
                let event = HistoryEvent::TaskFailed {
                    event_id: UNASSIGNED_EVENT_ID,
                    timestamp: self.clock.now(),
                    task_id,
                    failure,
                };
                self.store.add_message(TaskMessage::new(msg.instance, event)).await;
            }
            Ok(Err(err)) => {
                tracing::warn!(instance_id = %msg.instance, task_id, elapsed_ms, error = %err, "activity transport error; abandoning");
                self.queue.abandon(msg);
            }
            Err(_) => {
                tracing::warn!(instance_id = %msg.instance, task_id, elapsed_ms, "activity exceeded max duration; abandoning");
                self.queue.abandon(msg);
            }
        }
    }
}

#[cfg(test)]
#[path = "activity_dispatcher_tests.rs"]
mod tests;
