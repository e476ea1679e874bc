// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! Core data model for the durable task execution engine: instance and
//! execution identity, history events, the actions an orchestrator yields,
//! runtime status, and the clock abstraction used to make timers testable.
//!
//! Nothing in this crate talks to a queue, a store, or a network socket —
//! that's [`dte-storage`](../dte_storage/index.html),
//! [`dte-engine`](../dte_engine/index.html), and
//! [`dte-proxy`](../dte_proxy/index.html). This crate only defines the
//! shapes those layers pass around.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod actions;
pub mod clock;
pub mod error;
pub mod execution_id;
pub mod history;
pub mod id;
pub mod instance_id;
pub mod macros;
pub mod message;
pub mod query;
pub mod status;

pub use actions::OrchestratorAction;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{EngineError, EngineResult};
pub use execution_id::ExecutionId;
pub use history::{HistoryEvent, UNASSIGNED_EVENT_ID};
pub use instance_id::InstanceId;
pub use message::TaskMessage;
pub use query::{ContinuationToken, OrchestrationQuery};
pub use status::{FailureDetails, OrchestrationStatus, RuntimeStatus};
