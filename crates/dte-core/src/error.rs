// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Errors surfaced by the storage, engine, and client layers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("instance '{0}' already exists")]
    AlreadyExists(String),

    #[error("instance '{0}' not found")]
    NotFound(String),

    #[error("instance '{0}' is in an invalid state for this operation: {1}")]
    InvalidState(String, String),

    #[error("worker disconnected while a task was in flight")]
    WorkerDisconnected,

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("operation cancelled")]
    Cancelled,
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_id() {
        let err = EngineError::NotFound("abc-123".into());
        assert_eq!(err.to_string(), "instance 'abc-123' not found");
    }
}
