// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Instance identity: a case-insensitive string identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Number of hex characters in an auto-generated instance id.
const GENERATED_ID_LEN: usize = 32;

/// Unique identifier for an orchestration instance.
///
/// Comparison, hashing, and ordering are case-insensitive (ASCII), matching
/// the store's treatment of instance ids as case-insensitive keys, while the
/// original casing supplied by the caller is preserved for display and for
/// anything downstream that echoes it back (logs, status records).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh 32-character lowercase hex id, the default used by
    /// `ScheduleNew` when the caller doesn't supply one.
    pub fn generate() -> Self {
        let mut s = String::with_capacity(GENERATED_ID_LEN);
        for _ in 0..GENERATED_ID_LEN {
            s.push(std::char::from_digit(fastrand::u32(0..16), 16).unwrap_or('0'));
        }
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical lowercase form used as the store's internal map key.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InstanceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq for InstanceId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for InstanceId {}

impl PartialOrd for InstanceId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InstanceId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl std::hash::Hash for InstanceId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            b.to_ascii_lowercase().hash(state);
        }
    }
}

#[cfg(test)]
#[path = "instance_id_tests.rs"]
mod tests;
