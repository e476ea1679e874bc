// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Dispatcher concurrency and timeout policy (§4.4, §5, §9).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the orchestration and activity dispatchers.
///
/// Defaults follow §4.4 ("default = hardware parallelism") and §9's
/// heuristic 60-minute abandonment deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub max_concurrent_orchestration_turns: usize,
    pub max_concurrent_activity_turns: usize,
    /// Abandon a turn that hasn't produced a worker decision after this many
    /// seconds (§9's "maximum permissible turn duration... default 60 min").
    pub max_turn_duration_secs: u64,
}

impl DispatcherConfig {
    pub fn max_turn_duration(&self) -> Duration {
        Duration::from_secs(self.max_turn_duration_secs)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            max_concurrent_orchestration_turns: parallelism,
            max_concurrent_activity_turns: parallelism,
            max_turn_duration_secs: 60 * 60,
        }
    }
}
