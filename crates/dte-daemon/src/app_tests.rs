use super::*;
use crate::socket::CompletionFrame;
use crate::wire::{read_json, write_json};
use dte_client::ScheduleNewRequest;
use dte_core::actions::OrchestratorAction;
use dte_core::history::HistoryEvent;
use dte_core::status::RuntimeStatus;
use dte_proxy::WorkItem;
use std::time::Duration;
use tokio::net::UnixStream;

/// A fake worker for the "pure activity call" scenario (spec §8 scenario 1):
/// schedule one activity named `echo`, echo its result back as the
/// orchestrator's output.
async fn run_fake_worker(path: std::path::PathBuf) {
    let mut stream = loop {
        match UnixStream::connect(&path).await {
            Ok(s) => break s,
            Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    };

    loop {
        let item: WorkItem = match read_json(&mut stream).await {
            Ok(item) => item,
            Err(_) => return,
        };
        match item {
            WorkItem::Orchestrator(req) => {
                let already_scheduled =
                    req.past_events.iter().any(|e| matches!(e, HistoryEvent::TaskScheduled { .. }));
                let response = if !already_scheduled {
                    OrchestratorResponse {
                        actions: vec![OrchestratorAction::ScheduleTask {
                            task_id: 1,
                            name: "echo".into(),
                            input: req.new_events.iter().find_map(|m| match &m.event {
                                HistoryEvent::ExecutionStarted { input, .. } => input.clone(),
                                _ => None,
                            }),
                        }],
                        custom_status: None,
                    }
                } else {
                    let result = req.new_events.iter().find_map(|m| match &m.event {
                        HistoryEvent::TaskCompleted { result, .. } => Some(result.clone()),
                        _ => None,
                    });
                    OrchestratorResponse { actions: vec![OrchestratorAction::Complete { result: result.flatten() }], custom_status: None }
                };
                write_json(&mut stream, &CompletionFrame::Orchestrator { instance: req.instance, response })
                    .await
                    .expect("write orchestrator completion");
            }
            WorkItem::Activity(req) => {
                let completion = dte_proxy::ActivityCompletion { result: req.input.clone(), failure: None };
                write_json(
                    &mut stream,
                    &CompletionFrame::Activity { instance: req.instance, task_id: req.task_id, completion },
                )
                .await
                .expect("write activity completion");
            }
        }
    }
}

#[tokio::test]
async fn pure_activity_call_completes_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = DaemonConfig::default();
    config.socket_path = dir.path().join("worker.sock");
    config.reconnect_grace_secs = 1;

    let app = App::new(config.clone());
    let client = dte_client::TaskHubClient::new(std::sync::Arc::clone(&app.store));

    let shutdown = CancellationToken::new();
    let run_shutdown = shutdown.clone();
    let app_handle = tokio::spawn(async move { app.run(run_shutdown).await });

    tokio::spawn(run_fake_worker(config.socket_path.clone()));

    let id = client
        .schedule_new(ScheduleNewRequest::new("hello").with_instance_id("i1").with_input(serde_json::json!("x")))
        .await
        .expect("schedule_new");

    let final_status = tokio::time::timeout(Duration::from_secs(5), client.wait_for_completion(&id, &CancellationToken::new()))
        .await
        .expect("did not complete in time")
        .expect("instance should exist");

    assert_eq!(final_status.runtime_status, RuntimeStatus::Completed);
    assert_eq!(final_status.output, Some(serde_json::json!("x")));

    shutdown.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), app_handle).await;
}
