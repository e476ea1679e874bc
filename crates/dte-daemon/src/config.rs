// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Daemon configuration: an optional TOML file, layered under environment
//! variable overrides (grounded on the teacher's `oj_daemon::env` module,
//! which resolves every daemon setting from `OJ_*` environment variables —
//! we additionally accept a TOML file for the settings that are awkward to
//! spell as a single env var, namely the dispatcher tunables).

use dte_engine::config::DispatcherConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file '{path}': {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Path to the Unix domain socket workers connect to (§4.7's single
    /// streaming worker connection).
    pub socket_path: PathBuf,
    pub dispatcher: DispatcherConfig,
    /// How long a second worker connection waits for the first to detach
    /// before being rejected (§4.7's "brief retry window").
    pub reconnect_grace_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { socket_path: default_socket_path(), dispatcher: DispatcherConfig::default(), reconnect_grace_secs: 5 }
    }
}

/// `DTE_STATE_DIR` > `XDG_RUNTIME_DIR`/dte > `/tmp/dte`, mirroring the
/// teacher's `state_dir()` fallback chain.
fn default_socket_path() -> PathBuf {
    if let Ok(dir) = std::env::var("DTE_STATE_DIR") {
        return PathBuf::from(dir).join("worker.sock");
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(dir).join("dte").join("worker.sock");
    }
    PathBuf::from("/tmp/dte/worker.sock")
}

impl DaemonConfig {
    /// Load from a TOML file if it exists, then apply environment overrides.
    /// A missing file is not an error — the defaults (plus env overrides)
    /// apply, matching the teacher's env-only daemon config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("DTE_STATE_DIR") {
            self.socket_path = PathBuf::from(dir).join("worker.sock");
        }
        if let Ok(path) = std::env::var("DTE_SOCKET_PATH") {
            self.socket_path = PathBuf::from(path);
        }
        if let Some(n) = std::env::var("DTE_MAX_ORCH_TURNS").ok().and_then(|s| s.parse().ok()) {
            self.dispatcher.max_concurrent_orchestration_turns = n;
        }
        if let Some(n) = std::env::var("DTE_MAX_ACTIVITY_TURNS").ok().and_then(|s| s.parse().ok()) {
            self.dispatcher.max_concurrent_activity_turns = n;
        }
        if let Some(secs) = std::env::var("DTE_RECONNECT_GRACE_SECS").ok().and_then(|s| s.parse().ok()) {
            self.reconnect_grace_secs = secs;
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
