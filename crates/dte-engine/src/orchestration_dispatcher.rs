// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! The orchestration dispatcher: the turn loop described in §4.4.
//!
//! One instance is loaded, replayed against a worker, and its decisions
//! committed, per iteration. Multiple loops run concurrently (§4.4's "up to
//! `N_orch` concurrently"); each is just this same async function spawned
//! more than once, not a distinct actor.

use crate::config::DispatcherConfig;
use crate::executor::{Executor, OrchestratorRequest};
use crate::traffic_signal::TrafficSignal;
use crate::translate;
use dte_core::clock::Clock;
use dte_storage::instance_store::InstanceStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct OrchestrationDispatcher<S, E, C> {
    store: Arc<S>,
    executor: Arc<E>,
    signal: Arc<TrafficSignal>,
    config: DispatcherConfig,
    clock: C,
}

impl<S, E, C> OrchestrationDispatcher<S, E, C>
where
    S: InstanceStore,
    E: Executor,
    C: Clock,
{
    pub fn new(store: Arc<S>, executor: Arc<E>, signal: Arc<TrafficSignal>, config: DispatcherConfig, clock: C) -> Self {
        Self { store, executor, signal, config, clock }
    }

    /// Spawn `max_concurrent_orchestration_turns` copies of [`Self::run`].
    pub fn spawn(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        (0..self.config.max_concurrent_orchestration_turns)
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

            let (id, history, messages) = tokio::select! {
                next = self.store.get_next_ready_to_run_instance() => next,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    continue;
                }
            };

            self.run_turn(id, history, messages).await;
        }
    }

    async fn run_turn(
        &self,
        id: dte_core::instance_id::InstanceId,
        history: Vec<dte_core::history::HistoryEvent>,
        messages: Vec<dte_core::message::TaskMessage>,
    ) {
        let Some(status) = self.store.try_get_status(&id).await else {
            tracing::error!(instance_id = %id, "ready instance has no status record; dropping turn");
            self.store.release_lock(&id).await;
            return;
        };

        if let Some((signal, event)) = translate::detect_control(&messages) {
            let result = translate::plan_control_turn(history.len(), status, signal, event, &self.clock);
            self.store.save_turn(&id, result).await;
            self.store.release_lock(&id).await;
            return;
        }

        let parent = translate::find_parent(&history, &messages);
        let request = OrchestratorRequest {
            instance: id.clone(),
            execution_id: status.execution_id.clone(),
            past_events: history.clone(),
            new_events: messages.clone(),
        };

        let start = std::time::Instant::now();
        let outcome =
            tokio::time::timeout(self.config.max_turn_duration(), self.executor.execute_orchestrator(request)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(response)) => {
                tracing::debug!(instance_id = %id, op = "orchestration_turn", elapsed_ms, actions = response.actions.len(), "turn completed");
                let result =
                    translate::plan_normal_turn(&id, status, history.len(), messages, response, parent, &self.clock);
                self.store.save_turn(&id, result).await;
                self.store.release_lock(&id).await;
            }
            Ok(Err(err)) => {
                tracing::warn!(instance_id = %id, op = "orchestration_turn", elapsed_ms, error = %err, "worker call failed; abandoning turn");
                self.store.abandon_turn(&id, messages).await;
            }
            Err(_) => {
                tracing::warn!(instance_id = %id, op = "orchestration_turn", elapsed_ms, "turn exceeded max duration; abandoning");
                self.store.abandon_turn(&id, messages).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestration_dispatcher_tests.rs"]
mod tests;
