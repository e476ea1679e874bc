// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Request shapes for [`crate::TaskHubClient`] operations (§6).

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Arguments to [`crate::TaskHubClient::schedule_new`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleNewRequest {
    pub name: String,
    pub version: String,
    pub input: Option<serde_json::Value>,
    /// Caller-supplied id; if `None`, the client generates a fresh 32-char
    /// hex id (§6: "If `instanceId` omitted, generate a 32-char hex id").
    pub instance_id: Option<String>,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub tags: HashMap<String, String>,
}

impl ScheduleNewRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version: String::new(), ..Default::default() }
    }

    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    pub fn with_scheduled_start_time(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_start_time = Some(at);
        self
    }
}
