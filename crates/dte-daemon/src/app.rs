// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Wires the storage, engine, and proxy crates into one running process
//! (grounded on the teacher's `oj_daemon` top-level assembly: build shared
//! state, spawn the listener and the background loops, wait for shutdown).

use crate::config::DaemonConfig;
use crate::socket;
use dte_client::TaskHubClient;
use dte_core::clock::SystemClock;
use dte_engine::traffic_signal::TrafficSignal;
use dte_engine::{ActivityDispatcher, OrchestrationDispatcher};
use dte_proxy::{ConnectionConfig, ExecutorProxy};
use dte_storage::{ActivityQueue, DelayedQueue, InMemoryInstanceStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Everything a running daemon process holds. Construction alone has no
/// side effects beyond allocating in-memory state — call [`App::run`] to
/// actually spawn dispatchers and start accepting worker connections.
pub struct App {
    pub store: Arc<InMemoryInstanceStore>,
    pub client: TaskHubClient<InMemoryInstanceStore>,
    pub proxy: Arc<ExecutorProxy>,
    activity_queue: Arc<ActivityQueue>,
    signal: Arc<TrafficSignal>,
    config: DaemonConfig,
}

impl App {
    pub fn new(config: DaemonConfig) -> Self {
        let activity_queue = Arc::new(ActivityQueue::new());
        let delayed_queue = Arc::new(DelayedQueue::new());
        let store = Arc::new(InMemoryInstanceStore::new(Arc::clone(&activity_queue), delayed_queue));
        let signal = Arc::new(TrafficSignal::new());
        let proxy = ExecutorProxy::new(
            Arc::clone(&signal),
            ConnectionConfig {
                reconnect_grace: Duration::from_secs(config.reconnect_grace_secs),
                ..ConnectionConfig::default()
            },
        );
        let client = TaskHubClient::new(Arc::clone(&store));
        Self { store, client, proxy, activity_queue, signal, config }
    }

    /// Spawn the dispatchers, the delayed-message pump, and the worker
    /// socket listener; run until `shutdown` fires.
    pub async fn run(self, shutdown: CancellationToken) -> std::io::Result<()> {
        let (watch_tx, watch_rx) = watch::channel(false);
        let forward_token = shutdown.clone();
        let forward: JoinHandle<()> = tokio::spawn(async move {
            forward_token.cancelled().await;
            let _ = watch_tx.send(true);
        });

        let orchestration = Arc::new(OrchestrationDispatcher::new(
            Arc::clone(&self.store),
            Arc::clone(&self.proxy),
            Arc::clone(&self.signal),
            self.config.dispatcher.clone(),
            SystemClock,
        ));
        let activity = Arc::new(ActivityDispatcher::new(
            Arc::clone(&self.store),
            Arc::clone(&self.activity_queue),
            Arc::clone(&self.proxy),
            Arc::clone(&self.signal),
            self.config.dispatcher.clone(),
            SystemClock,
        ));

        let mut handles: Vec<JoinHandle<()>> = Vec::new();
        handles.extend(orchestration.spawn(watch_rx.clone()));
        handles.extend(activity.spawn(watch_rx.clone()));

        let store_for_pump = Arc::clone(&self.store);
        let pump_shutdown = watch_rx.clone();
        handles.push(tokio::spawn(async move { store_for_pump.run_delayed_pump(pump_shutdown).await }));

        let socket_result = socket::serve(Arc::clone(&self.proxy), &self.config.socket_path, shutdown).await;

        self.proxy.shutdown();
        for handle in handles {
            let _ = handle.await;
        }
        forward.abort();

        socket_result.map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
