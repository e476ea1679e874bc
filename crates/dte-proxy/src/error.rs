// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Errors raised by the proxy's connection and correlation logic (§4.7, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// A second `attach` arrived while a worker is already connected, and
    /// the reconnect grace window elapsed without the first one detaching
    /// (§4.7: "at most one attached worker... fails with a resource-exhausted
    /// error after a brief retry window that permits clean reconnects").
    #[error("a worker is already connected")]
    AlreadyConnected,

    /// A completion RPC referenced a correlation key with no pending entry
    /// (§4.7, §7.5: "completion for unknown correlation key ⇒ not-found").
    #[error("no pending task for correlation key '{0}'")]
    UnknownCorrelation(String),

    /// No worker is currently attached to send a work item to.
    #[error("no worker is attached")]
    NotConnected,
}

pub type ProxyResult<T> = Result<T, ProxyError>;
