// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Filters for listing and purging instances.

use crate::status::RuntimeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter criteria for listing orchestration instances.
///
/// All fields are conjunctive (AND'd together); an empty `statuses` means
/// "any status". `page_size` bounds a single page; [`ContinuationToken`]
/// carries the cursor for the next one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationQuery {
    #[serde(default)]
    pub statuses: Vec<RuntimeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id_prefix: Option<String>,
    #[serde(default)]
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<ContinuationToken>,
}

/// Opaque cursor into a query's result set.
///
/// Wraps a decimal count of records the store has already examined across
/// prior pages; the in-memory backend resumes its scan by skipping that
/// many records (§4.6, §6 "the integer count of records examined so far").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(pub String);

impl OrchestrationQuery {
    pub fn matches_status(&self, status: RuntimeStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_statuses_matches_everything() {
        let q = OrchestrationQuery::default();
        assert!(q.matches_status(RuntimeStatus::Running));
        assert!(q.matches_status(RuntimeStatus::Completed));
    }

    #[test]
    fn nonempty_statuses_filters() {
        let q = OrchestrationQuery { statuses: vec![RuntimeStatus::Failed], ..Default::default() };
        assert!(q.matches_status(RuntimeStatus::Failed));
        assert!(!q.matches_status(RuntimeStatus::Completed));
    }
}
