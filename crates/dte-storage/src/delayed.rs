// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Releases future-dated messages once their scheduled time arrives.

use chrono::{DateTime, Utc};
use dte_core::history::HistoryEvent;
use dte_core::message::TaskMessage;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Examine a message for a scheduled fire time (§4.3).
///
/// Only `TimerFired` (the message delivered when a timer matures) and
/// `ExecutionStarted` (when `ScheduledStartTime` is set) carry a deferred
/// delivery time (§4.1 step 3) — `TimerCreated` is a plain history record of
/// when a timer was requested, not a deferred message.
///
/// Returns the delay from `now` until the message should be released, or
/// `None` if the message has no scheduled time (or it has already passed).
pub fn scheduled_delay(event: &HistoryEvent, now: DateTime<Utc>) -> Option<std::time::Duration> {
    let fire_at = match event {
        HistoryEvent::TimerFired { fire_at, .. } => *fire_at,
        HistoryEvent::ExecutionStarted { scheduled_start_time: Some(t), .. } => *t,
        _ => return None,
    };
    let delta = fire_at - now;
    delta.to_std().ok()
}

/// Single-timer-per-message delayed release queue.
///
/// Spawns one `tokio::time::sleep` task per deferred message, tracked in a
/// `JoinSet` so shutdown can abort every outstanding timer at once (§4.3:
/// "must be cancellable on shutdown").
pub struct DelayedQueue {
    tasks: Mutex<JoinSet<TaskMessage>>,
}

impl DelayedQueue {
    pub fn new() -> Self {
        Self { tasks: Mutex::new(JoinSet::new()) }
    }

    /// Schedule `msg` for release after `delay`.
    pub async fn schedule(&self, msg: TaskMessage, delay: std::time::Duration) {
        self.tasks.lock().await.spawn(async move {
            tokio::time::sleep(delay).await;
            msg
        });
    }

    /// Wait for the next message whose delay has elapsed. Returns `None`
    /// once no timers remain outstanding.
    ///
    /// Holds the lock across `join_next`'s await — `tokio::sync::Mutex`
    /// rather than `parking_lot`'s, since the lock must stay held while
    /// yielding for a timer to fire.
    pub async fn next_released(&self) -> Option<TaskMessage> {
        loop {
            let mut tasks = self.tasks.lock().await;
            if tasks.is_empty() {
                return None;
            }
            match tasks.join_next().await {
                Some(Ok(msg)) => return Some(msg),
                Some(Err(_)) => continue,
                None => return None,
            }
        }
    }

    /// Abort every outstanding timer (shutdown).
    pub async fn shutdown(&self) {
        self.tasks.lock().await.abort_all();
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}

impl Default for DelayedQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "delayed_tests.rs"]
mod tests;
