// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Execution generation token.

crate::define_id! {
    /// Opaque generation token identifying one incarnation of an instance.
    ///
    /// A fresh `ExecutionId` is minted on every `ExecutionStarted` (initial
    /// create, restart, or continue-as-new); history is truncated to events
    /// produced under the current `ExecutionId`.
    pub struct ExecutionId("exe-");
}
