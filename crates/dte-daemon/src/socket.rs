// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Unix-socket transport for the worker-bound protocol (§4.7).
//!
//! One accepted connection is handed to [`dte_proxy::ExecutorProxy::attach`];
//! a second concurrent connection is rejected per the proxy's own
//! single-worker rule (which already implements the "brief retry window"
//! for clean reconnects), grounded on the teacher's
//! `oj_daemon::listener::Listener` accept-loop-per-connection shape.

use crate::wire::{read_json, write_json, ProtocolError};
use dte_core::instance_id::InstanceId;
use dte_engine::executor::OrchestratorResponse;
use dte_proxy::{ActivityCompletion, ExecutorProxy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;

/// What a worker sends back over the socket once it has decoded a
/// [`dte_proxy::WorkItem`] and acted on it (§6's `CompleteOrchestratorTask`
/// / `CompleteActivityTask` unary RPCs, flattened onto the same duplex
/// stream since there's no separate unary channel over a plain socket).
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CompletionFrame {
    Orchestrator { instance: InstanceId, response: OrchestratorResponse },
    Activity { instance: InstanceId, task_id: i64, completion: ActivityCompletion },
}

/// Accept worker connections on `socket_path` until `shutdown` fires.
pub async fn serve(
    proxy: Arc<ExecutorProxy>,
    socket_path: &Path,
    shutdown: CancellationToken,
) -> Result<(), ProtocolError> {
    if let Some(parent) = socket_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::remove_file(socket_path);
    let listener = UnixListener::bind(socket_path)?;
    tracing::info!(path = %socket_path.display(), "worker socket listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _) = accepted?;
                let proxy = Arc::clone(&proxy);
                let conn_shutdown = shutdown.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(proxy, stream, conn_shutdown).await {
                        tracing::warn!(error = %err, "worker connection ended");
                    }
                });
            }
            _ = shutdown.cancelled() => return Ok(()),
        }
    }
}

async fn handle_connection(
    proxy: Arc<ExecutorProxy>,
    stream: UnixStream,
    shutdown: CancellationToken,
) -> Result<(), ProtocolError> {
    let mut handle = match proxy.attach().await {
        Ok(handle) => handle,
        Err(err) => {
            tracing::warn!(error = %err, "rejecting worker connection");
            return Ok(());
        }
    };
    tracing::info!("worker attached");
    let (mut reader, mut writer) = stream.into_split();

    loop {
        tokio::select! {
            item = handle.recv() => {
                let Some(item) = item else { return Ok(()) };
                write_json(&mut writer, &item).await?;
            }
            frame = read_json::<_, CompletionFrame>(&mut reader) => {
                match frame {
                    Ok(CompletionFrame::Orchestrator { instance, response }) => {
                        if let Err(err) = proxy.complete_orchestrator_task(&instance, response) {
                            tracing::warn!(error = %err, "protocol violation on orchestrator completion");
                        }
                    }
                    Ok(CompletionFrame::Activity { instance, task_id, completion }) => {
                        if let Err(err) = proxy.complete_activity_task(&instance, task_id, completion) {
                            tracing::warn!(error = %err, "protocol violation on activity completion");
                        }
                    }
                    Err(ProtocolError::Closed) => {
                        tracing::info!("worker disconnected");
                        return Ok(());
                    }
                    Err(err) => return Err(err),
                }
            }
            _ = shutdown.cancelled() => return Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
