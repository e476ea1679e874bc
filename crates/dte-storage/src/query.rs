// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Filtered enumeration and bulk deletion over the record map.

use dte_core::instance_id::InstanceId;
use dte_core::query::{ContinuationToken, OrchestrationQuery};
use dte_core::status::OrchestrationStatus;

/// A page of results plus an opaque cursor for the next one.
pub struct QueryPage {
    pub instances: Vec<OrchestrationStatus>,
    pub continuation_token: Option<ContinuationToken>,
}

/// Parse the reference backend's continuation token: a decimal count of
/// records already examined (§6: "the reference in-memory backend uses a
/// numeric cursor of records examined so far").
pub fn parse_cursor(token: Option<&ContinuationToken>) -> usize {
    token.and_then(|t| t.0.parse::<usize>().ok()).unwrap_or(0)
}

pub fn encode_cursor(examined: usize) -> ContinuationToken {
    ContinuationToken(examined.to_string())
}

/// Apply `query`'s predicates (other than pagination) to one record.
pub fn matches(query: &OrchestrationQuery, id: &InstanceId, status: &OrchestrationStatus) -> bool {
    if !query.matches_status(status.runtime_status) {
        return false;
    }
    if let Some(after) = query.created_after {
        if status.created_at < after {
            return false;
        }
    }
    if let Some(before) = query.created_before {
        if status.created_at > before {
            return false;
        }
    }
    if let Some(name) = &query.name {
        if &status.name != name {
            return false;
        }
    }
    if let Some(prefix) = &query.instance_id_prefix {
        if !id.as_str().to_ascii_lowercase().starts_with(&prefix.to_ascii_lowercase()) {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
